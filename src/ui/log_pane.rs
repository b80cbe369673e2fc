use std::collections::VecDeque;

/// Most recent report lines shown under the progress gauge
#[derive(Debug, Clone)]
pub struct LogPane {
    lines: VecDeque<String>,
    capacity: usize,
}

impl LogPane {
    pub fn new(capacity: usize) -> Self {
        LogPane {
            lines: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, message: impl Into<String>) {
        if self.capacity == 0 {
            return;
        }
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(message.into());
    }

    /// The last `count` lines, oldest first
    pub fn tail(&self, count: usize) -> impl Iterator<Item = &str> {
        let skip = self.lines.len().saturating_sub(count);
        self.lines.iter().skip(skip).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drops_oldest_past_capacity() {
        let mut pane = LogPane::new(3);
        for i in 0..5 {
            pane.push(format!("line {}", i));
        }
        assert_eq!(
            pane.tail(10).collect::<Vec<_>>(),
            vec!["line 2", "line 3", "line 4"]
        );
    }

    #[test]
    fn test_tail_returns_newest() {
        let mut pane = LogPane::new(10);
        pane.push("a");
        pane.push("b");
        pane.push("c");
        assert_eq!(pane.tail(2).collect::<Vec<_>>(), vec!["b", "c"]);
    }

    #[test]
    fn test_zero_capacity_keeps_nothing() {
        let mut pane = LogPane::new(0);
        pane.push("ignored");
        assert_eq!(pane.tail(5).count(), 0);
    }
}
