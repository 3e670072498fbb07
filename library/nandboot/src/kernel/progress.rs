// library/nandboot/src/kernel/progress.rs
use core::fmt::Write;

use heapless::String;
use log::info;

const WIDTH: usize = 20;

/// Textual copy progress, logged every `step` percent.
pub struct ProgressBar {
    total: usize,
    step: usize,
    last: Option<usize>,
}

impl ProgressBar {
    pub fn new(total: usize, step: usize) -> Self {
        Self {
            total,
            step: step.clamp(1, 100),
            last: None,
        }
    }

    pub fn percent(&self, current: usize) -> usize {
        if self.total == 0 {
            return 100;
        }
        (current.min(self.total) as u64 * 100 / self.total as u64) as usize
    }

    /// Render `[=====>              ]  30%`.
    pub fn render(&self, current: usize) -> String<32> {
        let percent = self.percent(current);
        let filled = percent * WIDTH / 100;
        let mut bar = String::new();
        let _ = bar.push('[');
        for i in 0..WIDTH {
            let c = if i + 1 < filled || (i + 1 == filled && filled == WIDTH) {
                '='
            } else if i + 1 == filled {
                '>'
            } else {
                ' '
            };
            let _ = bar.push(c);
        }
        let _ = write!(bar, "] {:3}%", percent);
        bar
    }

    /// Returns whether a line was logged.
    pub fn update(&mut self, current: usize) -> bool {
        let percent = self.percent(current);
        let bucket = if percent == 100 { usize::MAX } else { percent / self.step };
        if self.last.is_some_and(|last| bucket <= last) {
            return false;
        }
        info!("copy {}", self.render(current));
        self.last = Some(bucket);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_bar_and_percent() {
        let bar = ProgressBar::new(200, 10);
        assert_eq!(bar.render(0).as_str(), "[                    ]   0%");
        assert_eq!(bar.render(60).as_str(), "[=====>              ]  30%");
        assert_eq!(bar.render(200).as_str(), "[====================] 100%");
        assert_eq!(bar.render(500).as_str(), "[====================] 100%");
    }

    #[test]
    fn logs_once_per_step() {
        let mut bar = ProgressBar::new(100, 25);
        let logged: usize = (0..=100).filter(|&i| bar.update(i)).count();
        // 0, 25, 50, 75, 100
        assert_eq!(logged, 5);
    }

    #[test]
    fn empty_total_is_complete() {
        let bar = ProgressBar::new(0, 10);
        assert_eq!(bar.percent(0), 100);
    }
}
