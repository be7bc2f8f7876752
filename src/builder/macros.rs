//! Macros for declaring flows.

/// Declare a list of [`FlowStep`](crate::core::FlowStep)s.
///
/// Each entry is `participant => pick` or `participant => ban`, optionally
/// followed by a label in parentheses.
///
/// # Example
///
/// ```
/// use pickban::core::{ActionKind, FlowDefinition};
/// use pickban::flow;
///
/// let steps = flow! {
///     0 => ban,
///     1 => ban,
///     0 => pick("Opening pick"),
///     1 => pick,
/// };
///
/// assert_eq!(steps[0].label, "Player 1 Ban");
/// assert_eq!(steps[2].label, "Opening pick");
/// assert_eq!(steps[3].action, ActionKind::Pick);
///
/// let flow = FlowDefinition::new(steps, 2, 4).unwrap();
/// assert_eq!(flow.len(), 4);
/// ```
#[macro_export]
macro_rules! flow {
    (
        $(
            $participant:literal => $kind:ident $( ( $label:expr ) )?
        ),* $(,)?
    ) => {
        ::std::vec![
            $( $crate::__flow_step!($participant, $kind $(, $label)?) ),*
        ]
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __flow_step {
    ($participant:expr, pick) => {
        $crate::core::FlowStep::unlabeled($participant, $crate::core::ActionKind::Pick)
    };
    ($participant:expr, ban) => {
        $crate::core::FlowStep::unlabeled($participant, $crate::core::ActionKind::Ban)
    };
    ($participant:expr, pick, $label:expr) => {
        $crate::core::FlowStep::new($label, $participant, $crate::core::ActionKind::Pick)
    };
    ($participant:expr, ban, $label:expr) => {
        $crate::core::FlowStep::new($label, $participant, $crate::core::ActionKind::Ban)
    };
}
