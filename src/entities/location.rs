use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Authorization {
    NotDetermined,
    Denied,
    Granted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fix {
    Idle,
    Pending,
    Satisfied,
}

/// One-shot location request state.
///
/// A fix is requested at most once per grant; after it lands the request is
/// satisfied and nothing else is asked of the provider until `refresh`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocationState {
    pub authorization: Authorization,
    pub alert: bool,
    pub fix: Fix,
}

impl Default for LocationState {
    fn default() -> Self {
        Self {
            authorization: Authorization::NotDetermined,
            alert: false,
            fix: Fix::Idle,
        }
    }
}

impl LocationState {
    /// Records a new authorization status, returns whether a fix must be requested.
    #[tracing::instrument]
    pub fn authorization_changed(&mut self, authorization: Authorization) -> bool {
        self.authorization = authorization;

        match authorization {
            Authorization::Denied => {
                self.alert = true;
                false
            }
            _ => self.request_fix(),
        }
    }

    pub fn request_fix(&mut self) -> bool {
        match self.fix {
            Fix::Idle => {
                self.fix = Fix::Pending;
                true
            }
            _ => false,
        }
    }

    /// Explicit request for a fresh fix once the previous one was satisfied.
    pub fn refresh(&mut self) -> bool {
        if self.authorization == Authorization::Denied {
            self.alert = true;
            return false;
        }

        match self.fix {
            Fix::Pending => false,
            Fix::Idle | Fix::Satisfied => {
                self.fix = Fix::Pending;
                true
            }
        }
    }

    pub fn fix_resolved(&mut self) -> bool {
        match self.fix {
            Fix::Pending => {
                self.fix = Fix::Satisfied;
                true
            }
            _ => false,
        }
    }

    pub fn fix_failed(&mut self) {
        if self.fix == Fix::Pending {
            self.fix = Fix::Idle;
        }
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = false;
    }
}
