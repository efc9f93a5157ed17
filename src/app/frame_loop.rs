use eframe::egui::Context;

#[derive(Debug)]
pub(in crate::app) struct FrameLoop {
    running: bool,
    frames: u64,
}

impl FrameLoop {
    pub(in crate::app) fn start() -> Self {
        Self {
            running: true,
            frames: 0,
        }
    }

    pub(in crate::app) fn stop(&mut self) {
        if self.running {
            tracing::debug!(frames = self.frames, "frame loop stopped");
        }
        self.running = false;
    }

    pub(in crate::app) fn is_running(&self) -> bool {
        self.running
    }

    pub(in crate::app) fn schedule(&mut self, ctx: &Context) {
        if !self.running {
            return;
        }
        self.frames += 1;
        ctx.request_repaint();
    }
}
