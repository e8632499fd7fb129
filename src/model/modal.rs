//! Modal stack for managing overlays
//!
//! Only the top modal receives input. The decision dialog keeps its own
//! state in [`DecisionState`](super::decision::DecisionState); the modal
//! entry just marks that it is showing.

/// A modal overlay displayed on top of the item list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
    /// Quit confirmation dialog
    QuitConfirm,
    /// Approve/reject dialog
    Decision,
    /// Keyboard shortcut reference
    Help,
}

/// A stack of modal overlays
///
/// Modals are rendered from bottom to top, with only the top modal
/// receiving input events.
#[derive(Debug, Default)]
pub struct ModalStack {
    stack: Vec<Modal>,
}

impl ModalStack {
    pub fn new() -> Self {
        Self { stack: Vec::new() }
    }

    pub fn push(&mut self, modal: Modal) {
        self.stack.push(modal);
    }

    pub fn pop(&mut self) -> Option<Modal> {
        self.stack.pop()
    }

    pub fn top(&self) -> Option<&Modal> {
        self.stack.last()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Remove every occurrence of `modal`, wherever it sits in the stack
    pub fn remove(&mut self, modal: &Modal) {
        self.stack.retain(|m| m != modal);
    }

    pub fn contains(&self, modal: &Modal) -> bool {
        self.stack.contains(modal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modal_stack_push_pop() {
        let mut stack = ModalStack::new();
        assert!(stack.top().is_none());

        stack.push(Modal::Decision);
        stack.push(Modal::QuitConfirm);

        assert_eq!(stack.pop(), Some(Modal::QuitConfirm));
        assert_eq!(stack.pop(), Some(Modal::Decision));
        assert!(stack.is_empty());
    }

    #[test]
    fn test_help_over_decision() {
        let mut stack = ModalStack::new();
        stack.push(Modal::Decision);
        stack.push(Modal::Help);

        assert_eq!(stack.top(), Some(&Modal::Help));
        assert!(stack.contains(&Modal::Decision));
    }

    #[test]
    fn test_remove_buried_modal() {
        let mut stack = ModalStack::new();
        stack.push(Modal::Decision);
        stack.push(Modal::QuitConfirm);

        stack.remove(&Modal::Decision);

        assert!(!stack.contains(&Modal::Decision));
        assert_eq!(stack.top(), Some(&Modal::QuitConfirm));
    }
}
