//! Structural form actions.
//!
//! The edit page has one submit button per structural action. The button's
//! name tells us what was pressed (`add_module`, `remove_module_<i>`,
//! `move_module_up_<i>`, `move_module_down_<i>`); anything else is a plain
//! submit. The action is parsed once at the handler boundary.

use super::form::DashboardForm;

const ADD_MODULE: &str = "add_module";
const REMOVE_MODULE_PREFIX: &str = "remove_module_";
const MOVE_UP_PREFIX: &str = "move_module_up_";
const MOVE_DOWN_PREFIX: &str = "move_module_down_";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    AddModule,
    RemoveModule(usize),
    MoveModuleUp(usize),
    MoveModuleDown(usize),
    Submit,
}

impl FormAction {
    /// Determine the action from submitted field names.
    ///
    /// The first recognised action name wins; malformed indices are ignored.
    #[must_use]
    pub fn from_fields(fields: &[(String, String)]) -> Self {
        fields
            .iter()
            .find_map(|(name, _)| Self::from_name(name))
            .unwrap_or(Self::Submit)
    }

    fn from_name(name: &str) -> Option<Self> {
        if name == ADD_MODULE {
            return Some(Self::AddModule);
        }
        if let Some(index) = indexed(name, REMOVE_MODULE_PREFIX) {
            return Some(Self::RemoveModule(index));
        }
        if let Some(index) = indexed(name, MOVE_UP_PREFIX) {
            return Some(Self::MoveModuleUp(index));
        }
        indexed(name, MOVE_DOWN_PREFIX).map(Self::MoveModuleDown)
    }

    /// Apply a structural action to the form's module list.
    ///
    /// Out-of-range indices and moves past either end are no-ops: a second
    /// tab may already have changed the list. `AddModule` and `Submit` leave
    /// the list untouched.
    pub fn apply(self, form: &mut DashboardForm) {
        let modules = &mut form.modules;
        match self {
            Self::RemoveModule(index) if index < modules.len() => {
                modules.remove(index);
            }
            Self::MoveModuleUp(index) if index > 0 && index < modules.len() => {
                modules.swap(index - 1, index);
            }
            Self::MoveModuleDown(index) if index < modules.len().saturating_sub(1) => {
                modules.swap(index, index + 1);
            }
            _ => {}
        }
    }
}

fn indexed(name: &str, prefix: &str) -> Option<usize> {
    name.strip_prefix(prefix)?.parse().ok()
}

#[cfg(test)]
#[path = "action_test.rs"]
mod tests;
