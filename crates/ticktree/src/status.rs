/// Result of ticking a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Failure,
    /// Cooperative signal meaning "re-invoke this exact node next tick
    /// without restarting the tree". Never blocks.
    Running,
}

/// Opaque error surfaced by user callables.
///
/// Anything error-like converts into it, so action code can use `?` freely
/// without committing the engine to an error framework.
pub type ActionError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Conversion applied to action callable results.
///
/// Implemented for [`Status`] (passes through, enabling `Running` actions),
/// for `bool` (`true` is success), and for `Result` over either so errors
/// bubble to the leaf boundary. Deliberately not implemented for `()`: an
/// action must say what happened.
pub trait IntoStatus {
    fn into_status(self) -> Result<Status, ActionError>;
}

impl IntoStatus for Status {
    fn into_status(self) -> Result<Status, ActionError> {
        Ok(self)
    }
}

impl IntoStatus for bool {
    fn into_status(self) -> Result<Status, ActionError> {
        Ok(if self { Status::Success } else { Status::Failure })
    }
}

impl<T, E> IntoStatus for Result<T, E>
where
    T: IntoStatus,
    E: Into<ActionError>,
{
    fn into_status(self) -> Result<Status, ActionError> {
        match self {
            Ok(value) => value.into_status(),
            Err(err) => Err(err.into()),
        }
    }
}

/// Conversion applied to condition callable results.
pub trait IntoCondition {
    fn into_condition(self) -> Result<bool, ActionError>;
}

impl IntoCondition for bool {
    fn into_condition(self) -> Result<bool, ActionError> {
        Ok(self)
    }
}

impl<T, E> IntoCondition for Result<T, E>
where
    T: IntoCondition,
    E: Into<ActionError>,
{
    fn into_condition(self) -> Result<bool, ActionError> {
        match self {
            Ok(value) => value.into_condition(),
            Err(err) => Err(err.into()),
        }
    }
}
