use std::fmt;

/// The stages of a stability calculation, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    EntryConstruction,
    HullConstruction,
    HullAnalysis,
    Rendering,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::EntryConstruction => "Building entries",
            Phase::HullConstruction => "Constructing hull",
            Phase::HullAnalysis => "Analyzing hull",
            Phase::Rendering => "Rendering diagram",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone)]
pub enum Progress {
    PhaseStart { phase: Phase },
    PhaseFinish,

    /// One step per entry whose region is being clipped.
    TaskStart { total_steps: u64 },
    TaskIncrement,
    TaskFinish,

    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }

    /// Runs `f` between a `PhaseStart` and a `PhaseFinish` event.
    pub fn phase<T>(&self, phase: Phase, f: impl FnOnce() -> T) -> T {
        self.report(Progress::PhaseStart { phase });
        let result = f();
        self.report(Progress::PhaseFinish);
        result
    }
}
