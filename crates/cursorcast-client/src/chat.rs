//! Chat-activation state machine.
//!
//! Purely local: none of this state is ever transmitted. Only the resulting
//! text rides in presence updates, via the publisher. The embedding UI feeds
//! key presses through [`ChatInput::handle_key`] and must suppress a key's
//! default effect whenever the outcome is [`KeyOutcome::Consumed`].

/// Key that opens the chat input.
pub const ACTIVATION_KEY: char = '/';

/// Width of the rendered input when the buffer is empty, in pixels.
pub const DEFAULT_INPUT_WIDTH: u32 = 240;

// ---------------------------------------------------------------------------
// Text measurement
// ---------------------------------------------------------------------------

/// Seam for the embedding UI's font metrics.
pub trait TextMeasure {
    /// Pixel extent of `text` in the input's font.
    fn measure(&self, text: &str) -> u32;
}

/// Fixed-advance measurement for hosts without real font metrics.
#[derive(Debug, Clone)]
pub struct MonospaceMeasure {
    pub advance: u32,
}

impl Default for MonospaceMeasure {
    fn default() -> Self {
        Self { advance: 8 }
    }
}

impl TextMeasure for MonospaceMeasure {
    fn measure(&self, text: &str) -> u32 {
        text.chars().count() as u32 * self.advance
    }
}

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

/// Whether the chat-input affordance is shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChatActivation {
    #[default]
    Inactive,
    Active,
}

/// A key press as seen by the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    Char(char),
    Backspace,
    Escape,
}

/// What the caller should do with the key after we've seen it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The key was handled; suppress its default effect.
    Consumed,
    /// Not ours; let it through.
    Ignored,
}

/// The local chat input: activation state plus the in-progress buffer.
///
/// Inactive means the bubble is not rendered; it says nothing about the
/// buffer's contents.
#[derive(Debug, Clone, Default)]
pub struct ChatInput {
    state: ChatActivation,
    text: String,
}

impl ChatInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.state == ChatActivation::Active
    }

    pub fn state(&self) -> ChatActivation {
        self.state
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Feed one key press through the machine.
    ///
    /// The activation key always opens the input and is never inserted,
    /// even while the input is already open. Escape closes the input and
    /// clears the buffer.
    pub fn handle_key(&mut self, key: KeyInput) -> KeyOutcome {
        match (self.state, key) {
            (_, KeyInput::Char(ACTIVATION_KEY)) => {
                self.state = ChatActivation::Active;
                KeyOutcome::Consumed
            }
            (ChatActivation::Active, KeyInput::Escape) => {
                self.state = ChatActivation::Inactive;
                self.text.clear();
                KeyOutcome::Consumed
            }
            (ChatActivation::Active, KeyInput::Char(c)) => {
                self.text.push(c);
                KeyOutcome::Consumed
            }
            (ChatActivation::Active, KeyInput::Backspace) => {
                self.text.pop();
                KeyOutcome::Consumed
            }
            _ => KeyOutcome::Ignored,
        }
    }

    /// Replace the buffer wholesale (e.g. from an input widget's value).
    /// No-op while inactive.
    pub fn set_text(&mut self, text: impl Into<String>) {
        if self.is_active() {
            self.text = text.into();
        }
    }

    /// Rendered input width: the measured extent of the text, or the fixed
    /// floor when the buffer is empty.
    pub fn width(&self, measurer: &impl TextMeasure) -> u32 {
        if self.text.is_empty() {
            DEFAULT_INPUT_WIDTH
        } else {
            measurer.measure(&self.text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activation_key_opens_and_is_suppressed() {
        let mut input = ChatInput::new();
        assert!(!input.is_active());

        let outcome = input.handle_key(KeyInput::Char('/'));
        assert_eq!(outcome, KeyOutcome::Consumed);
        assert!(input.is_active());
        // The slash itself never lands in the buffer.
        assert_eq!(input.text(), "");
    }

    #[test]
    fn escape_closes_and_clears_regardless_of_text_length() {
        let mut input = ChatInput::new();
        input.handle_key(KeyInput::Char('/'));
        for c in "a fairly long message".chars() {
            input.handle_key(KeyInput::Char(c));
        }
        assert_eq!(input.text(), "a fairly long message");

        let outcome = input.handle_key(KeyInput::Escape);
        assert_eq!(outcome, KeyOutcome::Consumed);
        assert!(!input.is_active());
        assert_eq!(input.text(), "");
    }

    #[test]
    fn keys_are_ignored_while_inactive() {
        let mut input = ChatInput::new();
        assert_eq!(input.handle_key(KeyInput::Char('x')), KeyOutcome::Ignored);
        assert_eq!(input.handle_key(KeyInput::Backspace), KeyOutcome::Ignored);
        assert_eq!(input.handle_key(KeyInput::Escape), KeyOutcome::Ignored);
        assert_eq!(input.text(), "");
    }

    #[test]
    fn editing_while_active() {
        let mut input = ChatInput::new();
        input.handle_key(KeyInput::Char('/'));
        input.handle_key(KeyInput::Char('h'));
        input.handle_key(KeyInput::Char('i'));
        assert_eq!(input.text(), "hi");

        input.handle_key(KeyInput::Backspace);
        assert_eq!(input.text(), "h");

        input.set_text("hello");
        assert_eq!(input.text(), "hello");
    }

    #[test]
    fn set_text_is_a_noop_while_inactive() {
        let mut input = ChatInput::new();
        input.set_text("sneaky");
        assert_eq!(input.text(), "");
    }

    #[test]
    fn empty_text_width_is_the_floor() {
        let input = ChatInput::new();
        assert_eq!(input.width(&MonospaceMeasure::default()), DEFAULT_INPUT_WIDTH);
    }

    #[test]
    fn non_empty_text_width_is_the_measured_extent() {
        let mut input = ChatInput::new();
        input.handle_key(KeyInput::Char('/'));
        for c in "hi".chars() {
            input.handle_key(KeyInput::Char(c));
        }
        let measurer = MonospaceMeasure { advance: 10 };
        assert_eq!(input.width(&measurer), 20);
    }

    #[test]
    fn reactivation_starts_with_an_empty_buffer() {
        let mut input = ChatInput::new();
        input.handle_key(KeyInput::Char('/'));
        input.handle_key(KeyInput::Char('x'));
        input.handle_key(KeyInput::Escape);

        input.handle_key(KeyInput::Char('/'));
        assert!(input.is_active());
        assert_eq!(input.text(), "");
    }
}
