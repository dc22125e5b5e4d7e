/// Guard layer: authorization decisions for every request handler
///
/// Guards are pure functions returning a [`Decision`]. They compose by
/// short-circuit AND through [`Decision::and_then`], so the first failing
/// guard's message and redirect win. Authentication is always checked before
/// identity or authorship.
///
/// # Action → guard chain
///
/// | Action                          | Guards                         |
/// |---------------------------------|--------------------------------|
/// | list users, register            | none                           |
/// | update/delete user              | authenticated, same user       |
/// | any status or label action      | authenticated                  |
/// | list/view/create/update task    | authenticated                  |
/// | delete task                     | authenticated, author          |
///
/// # Example
///
/// ```
/// use taskmanager_shared::auth::authorization::{authorize, Action, DenialKind};
/// use taskmanager_shared::auth::middleware::Actor;
/// use uuid::Uuid;
///
/// let me = Actor::new(Uuid::new_v4());
/// let someone_else = Uuid::new_v4();
///
/// assert!(authorize(Some(&me), Action::DeleteUser { target: me.id }).is_allowed());
///
/// let denial = authorize(Some(&me), Action::DeleteUser { target: someone_else })
///     .into_result()
///     .unwrap_err();
/// assert_eq!(denial.kind, DenialKind::Forbidden);
/// assert_eq!(denial.redirect.path(), "/users");
/// ```

use std::fmt;

use serde::{Serialize, Serializer};
use uuid::Uuid;

use super::middleware::Actor;

pub const NOT_AUTHENTICATED_MESSAGE: &str = "You are not authorized! Please sign in.";
pub const OTHER_USER_MESSAGE: &str = "You have no rights to change another user.";
pub const NOT_AUTHOR_MESSAGE: &str = "Only author can delete a task";

/// Redirect target attached to every decision and notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Location {
    Home,
    Login,
    UserList,
    StatusList,
    LabelList,
    TaskList,
}

impl Location {
    pub fn path(&self) -> &'static str {
        match self {
            Location::Home => "/",
            Location::Login => "/login",
            Location::UserList => "/users",
            Location::StatusList => "/statuses",
            Location::LabelList => "/labels",
            Location::TaskList => "/tasks",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl Serialize for Location {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.path())
    }
}

/// Why a request was denied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialKind {
    /// No actor on a guarded action
    Unauthenticated,

    /// Actor failed an identity or authorship check
    Forbidden,

    /// Delete blocked by tasks still referencing the target
    RestrictedByReference,
}

/// A failed guard: what went wrong, what to tell the user, where to send them
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct Denial {
    pub kind: DenialKind,
    pub message: String,
    pub redirect: Location,
}

impl Denial {
    pub fn new(kind: DenialKind, message: impl Into<String>, redirect: Location) -> Self {
        Self {
            kind,
            message: message.into(),
            redirect,
        }
    }
}

/// Outcome of a guard
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(Denial),
}

impl Decision {
    pub fn deny(kind: DenialKind, message: impl Into<String>, redirect: Location) -> Self {
        Decision::Deny(Denial::new(kind, message, redirect))
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    /// Short-circuit AND: evaluates `next` only when `self` allows
    pub fn and_then(self, next: impl FnOnce() -> Decision) -> Decision {
        match self {
            Decision::Allow => next(),
            deny => deny,
        }
    }

    /// Converts into a `Result` so handlers can use `?`
    pub fn into_result(self) -> Result<(), Denial> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(denial) => Err(denial),
        }
    }
}

/// Request handler actions subject to authorization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ListUsers,
    RegisterUser,
    UpdateUser { target: Uuid },
    DeleteUser { target: Uuid },

    ListStatuses,
    CreateStatus,
    UpdateStatus,
    DeleteStatus,

    ListLabels,
    CreateLabel,
    UpdateLabel,
    DeleteLabel,

    ListTasks,
    ViewTask,
    CreateTask,
    UpdateTask,
    DeleteTask { author_id: Uuid },
}

impl Action {
    /// Actions anyone may perform, signed in or not
    pub fn is_public(&self) -> bool {
        matches!(self, Action::ListUsers | Action::RegisterUser)
    }
}

/// Denies when there is no actor
pub fn require_authenticated(actor: Option<&Actor>) -> Decision {
    match actor {
        Some(_) => Decision::Allow,
        None => Decision::deny(
            DenialKind::Unauthenticated,
            NOT_AUTHENTICATED_MESSAGE,
            Location::Login,
        ),
    }
}

/// Denies when the actor is not the target user
pub fn require_same_user(actor: &Actor, target: Uuid) -> Decision {
    if actor.id == target {
        Decision::Allow
    } else {
        Decision::deny(DenialKind::Forbidden, OTHER_USER_MESSAGE, Location::UserList)
    }
}

/// Denies when the actor did not author the task
pub fn require_author(actor: &Actor, author_id: Uuid) -> Decision {
    if actor.id == author_id {
        Decision::Allow
    } else {
        Decision::deny(DenialKind::Forbidden, NOT_AUTHOR_MESSAGE, Location::TaskList)
    }
}

/// Runs the guard chain for `action` on behalf of `actor`
pub fn authorize(actor: Option<&Actor>, action: Action) -> Decision {
    if action.is_public() {
        return Decision::Allow;
    }

    require_authenticated(actor).and_then(|| match (actor, action) {
        (Some(actor), Action::UpdateUser { target } | Action::DeleteUser { target }) => {
            require_same_user(actor, target)
        }
        (Some(actor), Action::DeleteTask { author_id }) => require_author(actor, author_id),
        _ => Decision::Allow,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guarded_actions(id: Uuid) -> Vec<Action> {
        vec![
            Action::UpdateUser { target: id },
            Action::DeleteUser { target: id },
            Action::ListStatuses,
            Action::CreateStatus,
            Action::UpdateStatus,
            Action::DeleteStatus,
            Action::ListLabels,
            Action::CreateLabel,
            Action::UpdateLabel,
            Action::DeleteLabel,
            Action::ListTasks,
            Action::ViewTask,
            Action::CreateTask,
            Action::UpdateTask,
            Action::DeleteTask { author_id: id },
        ]
    }

    #[test]
    fn test_location_paths() {
        assert_eq!(Location::Home.path(), "/");
        assert_eq!(Location::Login.path(), "/login");
        assert_eq!(Location::UserList.path(), "/users");
        assert_eq!(Location::StatusList.path(), "/statuses");
        assert_eq!(Location::LabelList.path(), "/labels");
        assert_eq!(Location::TaskList.to_string(), "/tasks");
    }

    #[test]
    fn test_public_actions_need_no_actor() {
        assert!(authorize(None, Action::ListUsers).is_allowed());
        assert!(authorize(None, Action::RegisterUser).is_allowed());
    }

    #[test]
    fn test_anonymous_actor_is_unauthenticated_for_every_guarded_action() {
        for action in guarded_actions(Uuid::new_v4()) {
            let denial = authorize(None, action).into_result().unwrap_err();

            assert_eq!(denial.kind, DenialKind::Unauthenticated, "{:?}", action);
            assert_eq!(denial.message, NOT_AUTHENTICATED_MESSAGE);
            assert_eq!(denial.redirect, Location::Login);
        }
    }

    #[test]
    fn test_authenticated_actor_on_own_resources() {
        let actor = Actor::new(Uuid::new_v4());

        for action in guarded_actions(actor.id) {
            assert!(authorize(Some(&actor), action).is_allowed(), "{:?}", action);
        }
    }

    #[test]
    fn test_user_cannot_modify_another_user() {
        let actor = Actor::new(Uuid::new_v4());
        let other = Uuid::new_v4();

        for action in [Action::UpdateUser { target: other }, Action::DeleteUser { target: other }] {
            let denial = authorize(Some(&actor), action).into_result().unwrap_err();

            assert_eq!(denial.kind, DenialKind::Forbidden);
            assert_eq!(denial.message, OTHER_USER_MESSAGE);
            assert_eq!(denial.redirect, Location::UserList);
        }
    }

    #[test]
    fn test_only_author_deletes_task() {
        let author = Actor::new(Uuid::new_v4());
        let stranger = Actor::new(Uuid::new_v4());
        let action = Action::DeleteTask { author_id: author.id };

        assert!(authorize(Some(&author), action).is_allowed());

        let denial = authorize(Some(&stranger), action).into_result().unwrap_err();
        assert_eq!(denial.kind, DenialKind::Forbidden);
        assert_eq!(denial.message, NOT_AUTHOR_MESSAGE);
        assert_eq!(denial.redirect, Location::TaskList);
    }

    #[test]
    fn test_any_authenticated_user_updates_any_task() {
        let stranger = Actor::new(Uuid::new_v4());
        assert!(authorize(Some(&stranger), Action::UpdateTask).is_allowed());
    }

    #[test]
    fn test_and_then_short_circuits() {
        let first = Decision::deny(DenialKind::Unauthenticated, "first", Location::Login);

        let combined = first.and_then(|| panic!("second guard must not run"));
        assert_eq!(combined.into_result().unwrap_err().message, "first");

        let allowed = Decision::Allow.and_then(|| {
            Decision::deny(DenialKind::Forbidden, "second", Location::Home)
        });
        assert_eq!(allowed.into_result().unwrap_err().message, "second");
    }

    #[test]
    fn test_denial_display_and_serialization() {
        let denial = Denial::new(DenialKind::RestrictedByReference, "in use", Location::LabelList);
        assert_eq!(denial.to_string(), "in use");

        assert_eq!(
            serde_json::to_value(DenialKind::RestrictedByReference).unwrap(),
            serde_json::json!("restricted_by_reference")
        );
        assert_eq!(
            serde_json::to_value(Location::LabelList).unwrap(),
            serde_json::json!("/labels")
        );
    }
}
