/// Router Module Index
///
/// Routes are grouped by the allow-list that guards them. `create_router`
/// wraps each protected group in the role guard with its list; the groups
/// themselves contain no authorization code.

/// Routes accessible without a token.
pub mod public;

/// Routes admitting the `user` role (and, implicitly, `admin`).
pub mod authenticated;

/// Routes admitting only `admin`.
pub mod admin;
