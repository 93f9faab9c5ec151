/// Lifecycle of a pitch shifter
///
/// ```text
/// Uninitialized --initialize--> Ready --release--> Released
///                                  ^                  |
///                                  +---initialize-----+
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifecycleState {
    #[default]
    Uninitialized,
    Ready,
    Released,
}

/// What an `initialize` or `release` request should do in the current state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Perform the work and move to the new state
    Apply(LifecycleState),
    /// Already there; succeed without doing anything
    Ignore,
}

impl LifecycleState {
    pub fn is_ready(self) -> bool {
        self == LifecycleState::Ready
    }

    pub fn on_initialize(self) -> Transition {
        match self {
            LifecycleState::Ready => Transition::Ignore,
            LifecycleState::Uninitialized | LifecycleState::Released => {
                Transition::Apply(LifecycleState::Ready)
            }
        }
    }

    pub fn on_release(self) -> Transition {
        match self {
            LifecycleState::Ready => Transition::Apply(LifecycleState::Released),
            LifecycleState::Uninitialized | LifecycleState::Released => Transition::Ignore,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialize_transitions() {
        assert_eq!(
            LifecycleState::Uninitialized.on_initialize(),
            Transition::Apply(LifecycleState::Ready)
        );
        assert_eq!(LifecycleState::Ready.on_initialize(), Transition::Ignore);
        assert_eq!(
            LifecycleState::Released.on_initialize(),
            Transition::Apply(LifecycleState::Ready)
        );
    }

    #[test]
    fn test_release_transitions() {
        assert_eq!(LifecycleState::Uninitialized.on_release(), Transition::Ignore);
        assert_eq!(
            LifecycleState::Ready.on_release(),
            Transition::Apply(LifecycleState::Released)
        );
        assert_eq!(LifecycleState::Released.on_release(), Transition::Ignore);
    }

    #[test]
    fn test_only_ready_is_ready() {
        assert!(!LifecycleState::default().is_ready());
        assert!(LifecycleState::Ready.is_ready());
        assert!(!LifecycleState::Released.is_ready());
    }
}
