mod build;
pub(super) mod canvas;
pub(super) mod interaction;
pub(super) mod view;
