//! Action dispatch.
//!
//! Inline and bulk actions are passed through untouched; the caller's UI binds
//! them to its own handlers. Page actions with an endpoint become executable:
//! [`ActionablePageAction::exec`] issues the navigation their endpoint names.

use crate::model::{Actions, BulkAction, HttpMethod, InlineAction, PageAction};
use crate::navigation::{NavigationContext, VisitOptions};
use serde_json::Value;
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;
use tracing::debug;

// ===== ActionablePageAction =====

/// A page action bound to a navigator.
#[derive(Clone)]
pub struct ActionablePageAction {
    action: PageAction,
    navigator: Rc<dyn NavigationContext>,
}

impl ActionablePageAction {
    /// The underlying descriptor.
    pub fn action(&self) -> &PageAction {
        &self.action
    }

    /// Submit the action to its endpoint.
    ///
    /// Without an endpoint this does nothing and returns `false`. DELETE
    /// requests carry only `options`; every other verb sends `data` as the
    /// payload.
    pub fn exec(&self, data: Value, options: VisitOptions) -> bool {
        let Some(endpoint) = &self.action.endpoint else {
            debug!(action = %self.action.name, "page action has no endpoint");
            return false;
        };

        debug!(
            action = %self.action.name,
            method = %endpoint.method,
            route = %endpoint.route,
            "executing page action"
        );
        match endpoint.method {
            HttpMethod::Delete => self.navigator.delete(&endpoint.route, options),
            method => self.navigator.visit(
                &endpoint.route,
                options.with_method(method).with_data(data),
            ),
        }
        true
    }
}

impl Deref for ActionablePageAction {
    type Target = PageAction;

    fn deref(&self) -> &PageAction {
        &self.action
    }
}

impl fmt::Debug for ActionablePageAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionablePageAction")
            .field("action", &self.action)
            .finish_non_exhaustive()
    }
}

// ===== ActionBinder =====

/// A table's actions, with page actions bound to a navigator.
#[derive(Clone)]
pub struct ActionBinder {
    actions: Actions,
    navigator: Rc<dyn NavigationContext>,
}

impl ActionBinder {
    /// Bind `actions` to `navigator`.
    pub fn new(actions: Actions, navigator: Rc<dyn NavigationContext>) -> Self {
        Self { actions, navigator }
    }

    /// Descriptors as declared.
    pub fn actions(&self) -> &Actions {
        &self.actions
    }

    /// Row actions.
    pub fn inline(&self) -> &[InlineAction] {
        &self.actions.inline
    }

    /// Selection actions.
    pub fn bulk(&self) -> &[BulkAction] {
        &self.actions.bulk
    }

    /// Row action run when a row itself is clicked.
    pub fn default_action(&self) -> Option<&InlineAction> {
        self.actions.default.as_ref()
    }

    /// Page actions in declaration order.
    pub fn page(&self) -> Vec<ActionablePageAction> {
        self.actions
            .page
            .iter()
            .map(|action| self.bind(action))
            .collect()
    }

    /// Page action named `name`.
    pub fn get_page(&self, name: &str) -> Option<ActionablePageAction> {
        self.actions
            .page
            .iter()
            .find(|action| action.name == name)
            .map(|action| self.bind(action))
    }

    fn bind(&self, action: &PageAction) -> ActionablePageAction {
        ActionablePageAction {
            action: action.clone(),
            navigator: Rc::clone(&self.navigator),
        }
    }
}

impl fmt::Debug for ActionBinder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionBinder")
            .field("actions", &self.actions)
            .finish_non_exhaustive()
    }
}
