//! Typewriter animation for the feed hero line

use std::time::Duration;

use eframe::egui::{FontId, RichText, Ui};

/// Types each phrase out, holds it, deletes it and moves on to the next
#[derive(Debug, Clone)]
pub struct Typewriter {
    phrases: Vec<String>,
    type_step: Duration,
    delete_step: Duration,
    hold: Duration,
}

impl Default for Typewriter {
    fn default() -> Self {
        Self::new(vec![
            "Share your snippets.".to_string(),
            "Build with blocks.".to_string(),
            "Show off your CSS.".to_string(),
        ])
    }
}

impl Typewriter {
    pub fn new(phrases: Vec<String>) -> Self {
        Self {
            phrases,
            type_step: Duration::from_millis(80),
            delete_step: Duration::from_millis(40),
            hold: Duration::from_millis(1500),
        }
    }

    fn cycle_of(&self, chars: usize) -> Duration {
        self.type_step * chars as u32 + self.hold + self.delete_step * chars as u32
    }

    /// The visible text `elapsed` after the animation started
    pub fn text_at(&self, elapsed: Duration) -> &str {
        let total: Duration = self
            .phrases
            .iter()
            .map(|p| self.cycle_of(p.chars().count()))
            .sum();
        if total.is_zero() {
            return "";
        }

        let mut t = Duration::from_nanos((elapsed.as_nanos() % total.as_nanos()) as u64);
        for phrase in &self.phrases {
            let chars = phrase.chars().count();
            let cycle = self.cycle_of(chars);
            if t >= cycle {
                t -= cycle;
                continue;
            }

            let typing = self.type_step * chars as u32;
            let visible = if t < typing {
                (t.as_nanos() / self.type_step.as_nanos()) as usize + 1
            } else if t < typing + self.hold {
                chars
            } else {
                let deleted = ((t - typing - self.hold).as_nanos() / self.delete_step.as_nanos()) as usize + 1;
                chars.saturating_sub(deleted)
            };
            return prefix_chars(phrase, visible.min(chars));
        }
        ""
    }

    /// Draw the current frame with a caret and schedule the next one
    pub fn show(&self, ui: &mut Ui, elapsed: Duration, size: f32) {
        let text = format!("{}▌", self.text_at(elapsed));
        ui.label(RichText::new(text).font(FontId::proportional(size)).strong());
        ui.ctx().request_repaint_after(self.delete_step.min(self.type_step));
    }
}

fn prefix_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_types_then_holds_then_deletes() {
        let tw = Typewriter::new(vec!["abc".to_string()]);
        assert_eq!(tw.text_at(ms(0)), "a");
        assert_eq!(tw.text_at(ms(85)), "ab");
        assert_eq!(tw.text_at(ms(239)), "abc");
        assert_eq!(tw.text_at(ms(240 + 1000)), "abc");
        assert_eq!(tw.text_at(ms(240 + 1500)), "ab");
        assert_eq!(tw.text_at(ms(240 + 1500 + 85)), "");
    }

    #[test]
    fn test_cycles_through_phrases() {
        let tw = Typewriter::new(vec!["ab".to_string(), "xyz".to_string()]);
        let first_cycle = ms(160 + 1500 + 80);
        assert_eq!(tw.text_at(first_cycle), "x");
        let both = first_cycle + ms(240 + 1500 + 120);
        assert_eq!(tw.text_at(both), "a");
    }

    #[test]
    fn test_multibyte_phrases() {
        let tw = Typewriter::new(vec!["héllo→".to_string()]);
        assert_eq!(tw.text_at(ms(90)), "hé");
        assert_eq!(tw.text_at(ms(480 + 100)), "héllo→");
    }

    #[test]
    fn test_empty_phrases() {
        assert_eq!(Typewriter::new(Vec::new()).text_at(ms(1234)), "");
    }
}
