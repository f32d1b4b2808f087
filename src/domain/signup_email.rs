use validator::validate_email;

/// A syntactically valid email address.
///
/// The check is deliberately permissive; deeper validation (deliverability,
/// typo'd domains) is deferred to the mail provider.
#[derive(Clone, Debug, PartialEq)]
pub struct SignupEmail(String);

impl SignupEmail {
    pub fn parse(s: String) -> Result<SignupEmail, String> {
        if validate_email(&s) {
            Ok(Self(s))
        } else {
            Err(format!("{} is not a valid email address.", s))
        }
    }
}

impl AsRef<str> for SignupEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SignupEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
