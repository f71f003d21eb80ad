/// Receives `(done, total)` updates while a maze is carved.
pub trait ProgressReporter {
    fn report(&mut self, done: usize, total: usize);
}

/// Discards every update.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn report(&mut self, _done: usize, _total: usize) {}
}

/// Logs each update at info level under a label.
#[derive(Debug, Clone)]
pub struct LogProgress {
    label: String,
}

impl LogProgress {
    pub fn new(label: impl Into<String>) -> Self {
        LogProgress {
            label: label.into(),
        }
    }
}

impl ProgressReporter for LogProgress {
    fn report(&mut self, done: usize, total: usize) {
        tracing::info!("[{}] {}%", self.label, percent(done, total));
    }
}

fn percent(done: usize, total: usize) -> usize {
    if total == 0 {
        100
    } else {
        done.min(total) * 100 / total
    }
}

/// Forwards an update only when the whole percentage has grown since the last one.
pub struct Throttle<'a> {
    inner: &'a mut dyn ProgressReporter,
    last: Option<usize>,
    total: usize,
}

impl<'a> Throttle<'a> {
    pub fn new(inner: &'a mut dyn ProgressReporter) -> Self {
        Throttle {
            inner,
            last: None,
            total: 0,
        }
    }

    pub fn tick(&mut self, done: usize, total: usize) {
        let percent = percent(done, total);
        self.total = total;
        if self.last.is_none_or(|last| percent > last) {
            self.last = Some(percent);
            self.inner.report(done, total);
        }
    }

    /// Reports completion unless 100% was already sent.
    pub fn finish(&mut self) {
        let total = self.total.max(1);
        self.tick(total, total);
    }
}
