use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

pub fn truncate_label(label: &str, max_chars: usize) -> String {
    if label.chars().count() <= max_chars {
        return label.to_owned();
    }

    let keep = max_chars.saturating_sub(1);
    let mut truncated = label.chars().take(keep).collect::<String>();
    truncated.push('…');
    truncated
}

pub fn stable_pair(id: &str) -> (f32, f32) {
    let mut hasher = DefaultHasher::new();
    id.hash(&mut hasher);
    let hash = hasher.finish();

    let x = ((hash & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    let y = (((hash >> 32) & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    ((x * 2.0) - 1.0, (y * 2.0) - 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_labels_are_untouched() {
        assert_eq!(truncate_label("Acme Corp", 18), "Acme Corp");
    }

    #[test]
    fn long_labels_are_cut_on_char_boundaries() {
        let label = truncate_label("Société Générale de Banque", 8);
        assert_eq!(label.chars().count(), 8);
        assert!(label.ends_with('…'));
        assert!(label.starts_with("Société"));
    }

    #[test]
    fn stable_pair_is_deterministic_and_bounded() {
        let first = stable_pair("node-42");
        let second = stable_pair("node-42");
        assert_eq!(first, second);
        assert!((-1.0..=1.0).contains(&first.0));
        assert!((-1.0..=1.0).contains(&first.1));
    }
}
