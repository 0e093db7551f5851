use serde::{Deserialize, Serialize};

use fgia_config::{Auth, PathRule};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
	Allow,
	Redirect(String),
}

/// Per-request rule for protected paths: a session is required, and its email must end with the
/// organization suffix.
#[derive(Debug, Clone)]
pub struct AccessPolicy {
	protected: Vec<PathRule>,
	allowed_email_suffix: String,
	signin_path: String,
	error_path: String,
}
impl AccessPolicy {
	pub fn new(
		protected: Vec<PathRule>,
		allowed_email_suffix: impl Into<String>,
		signin_path: impl Into<String>,
		error_path: impl Into<String>,
	) -> Self {
		Self {
			protected,
			allowed_email_suffix: allowed_email_suffix.into().to_ascii_lowercase(),
			signin_path: signin_path.into(),
			error_path: error_path.into(),
		}
	}

	pub fn from_config(auth: &Auth) -> Self {
		Self::new(
			auth.protected_paths.clone(),
			auth.allowed_email_suffix.as_str(),
			auth.signin_path.as_str(),
			auth.error_path.as_str(),
		)
	}

	pub fn is_protected(&self, path: &str) -> bool {
		self.protected.iter().any(|rule| rule.matches(path))
	}

	/// `session_email` is `None` when the request carries no valid session.
	pub fn decide(&self, path: &str, session_email: Option<&str>) -> GateDecision {
		if !self.is_protected(path) {
			return GateDecision::Allow;
		}

		match session_email {
			None => GateDecision::Redirect(self.signin_path.clone()),
			Some(email) if !self.email_allowed(email) =>
				GateDecision::Redirect(self.error_path.clone()),
			Some(_) => GateDecision::Allow,
		}
	}

	/// Sign-in callback rule. Identities failing it never receive a session.
	pub fn allows_sign_in(&self, email: Option<&str>) -> bool {
		email.is_some_and(|email| self.email_allowed(email))
	}

	pub fn email_allowed(&self, email: &str) -> bool {
		let email = email.trim();

		email.len() > self.allowed_email_suffix.len()
			&& email.to_ascii_lowercase().ends_with(&self.allowed_email_suffix)
	}

	pub fn allowed_email_suffix(&self) -> &str {
		&self.allowed_email_suffix
	}

	pub fn signin_path(&self) -> &str {
		&self.signin_path
	}

	pub fn error_path(&self) -> &str {
		&self.error_path
	}
}

/// Advisory label shown to users. No authorization decision reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
	Admin,
	Developer,
	Support,
}
impl UserRole {
	pub fn from_email(email: &str) -> Self {
		let email = email.to_ascii_lowercase();

		if email.contains("admin") || email.contains("gerente") {
			Self::Admin
		} else if email.contains("dev") {
			Self::Developer
		} else {
			Self::Support
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Admin => "admin",
			Self::Developer => "developer",
			Self::Support => "support",
		}
	}
}
