use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use pourbaix2d::engine::progress::{Phase, Progress, ProgressCallback};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::debug;

const SPINNER_TICK: Duration = Duration::from_millis(80);

/// Renders workflow progress on one stderr line: a spinner per phase,
/// switching to a bar while the hull clips entry regions.
#[derive(Clone)]
pub struct CliProgressHandler {
    bar: ProgressBar,
    phase: Arc<Mutex<Option<Phase>>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self::with_target(ProgressDrawTarget::stderr())
    }

    fn with_target(target: ProgressDrawTarget) -> Self {
        let bar = ProgressBar::with_draw_target(None, target).with_style(spinner_style());
        Self {
            bar,
            phase: Arc::new(Mutex::new(None)),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let handler = self.clone();
        Box::new(move |event| handler.handle(event))
    }

    fn current_label(&self) -> &'static str {
        self.phase
            .lock()
            .ok()
            .and_then(|p| *p)
            .map_or("Working", |p| p.label())
    }

    fn handle(&self, event: Progress) {
        match event {
            Progress::PhaseStart { phase } => {
                if let Ok(mut current) = self.phase.lock() {
                    *current = Some(phase);
                }
                debug!(%phase, "Phase started.");
                self.bar.reset();
                self.bar.unset_length();
                self.bar.set_style(spinner_style());
                self.bar.set_message(phase.label());
                self.bar.enable_steady_tick(SPINNER_TICK);
            }
            Progress::PhaseFinish => {
                self.bar.disable_steady_tick();
                self.bar
                    .finish_with_message(format!("✓ {}", self.current_label()));
            }
            Progress::TaskStart { total_steps } => {
                self.bar.disable_steady_tick();
                self.bar.set_style(bar_style());
                self.bar.set_length(total_steps);
                self.bar.set_position(0);
            }
            Progress::TaskIncrement => self.bar.inc(1),
            Progress::TaskFinish => {
                if let Some(len) = self.bar.length() {
                    self.bar.set_position(len);
                }
            }
            Progress::Message(msg) => self.bar.println(format!("  {}", msg)),
        }
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

pub fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

pub fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template("{msg:<20} [{wide_bar:.cyan/blue}] {pos:>4}/{len:4} [{elapsed}]")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn hidden() -> CliProgressHandler {
        CliProgressHandler::with_target(ProgressDrawTarget::hidden())
    }

    #[test]
    fn hull_phase_switches_from_spinner_to_bar() {
        let handler = hidden();
        let callback = handler.get_callback();

        callback(Progress::PhaseStart {
            phase: Phase::HullConstruction,
        });
        assert_eq!(handler.bar.message(), "Constructing hull");
        assert_eq!(handler.bar.length(), None);

        callback(Progress::TaskStart { total_steps: 7 });
        assert_eq!(handler.bar.length(), Some(7));
        assert_eq!(handler.bar.position(), 0);

        callback(Progress::TaskIncrement);
        callback(Progress::TaskIncrement);
        assert_eq!(handler.bar.position(), 2);

        callback(Progress::TaskFinish);
        assert_eq!(handler.bar.position(), 7);

        callback(Progress::PhaseFinish);
        assert!(handler.bar.is_finished());
        assert_eq!(handler.bar.message(), "✓ Constructing hull");
    }

    #[test]
    fn a_new_phase_restarts_a_finished_bar() {
        let handler = hidden();
        let callback = handler.get_callback();

        callback(Progress::PhaseStart {
            phase: Phase::EntryConstruction,
        });
        callback(Progress::PhaseFinish);
        callback(Progress::PhaseStart {
            phase: Phase::HullAnalysis,
        });

        assert!(!handler.bar.is_finished());
        assert_eq!(handler.bar.message(), "Analyzing hull");
    }

    #[test]
    fn callback_can_be_driven_from_another_thread() {
        let handler = hidden();
        let callback = handler.get_callback();

        thread::spawn(move || {
            callback(Progress::PhaseStart {
                phase: Phase::Rendering,
            });
            callback(Progress::PhaseFinish);
        })
        .join()
        .unwrap();

        assert_eq!(handler.bar.message(), "✓ Rendering diagram");
    }
}
