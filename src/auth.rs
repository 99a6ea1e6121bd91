/// Decides who may trigger ingestion.
pub trait Authorizer: Send + Sync {
    fn is_authorized(&self, caller_id: &str) -> bool;
}

/// Exactly one user is allowed.
pub struct SinglePrincipal {
    user_id: String,
}

impl SinglePrincipal {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

impl Authorizer for SinglePrincipal {
    fn is_authorized(&self, caller_id: &str) -> bool {
        caller_id == self.user_id
    }
}

impl<F> Authorizer for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn is_authorized(&self, caller_id: &str) -> bool {
        self(caller_id)
    }
}
