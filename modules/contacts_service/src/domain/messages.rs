//! Client-facing message texts

pub const USER_EMAIL_ALREADY_EXISTS: &str = "User with such email already exists";
pub const USER_NAME_ALREADY_EXISTS: &str = "User with such username already exists";
pub const INVALID_CREDENTIALS: &str = "Incorrect username or password";
pub const USER_NOT_CONFIRMED: &str = "Email address not confirmed";
pub const UNAUTHORIZED: &str = "Could not validate credentials";
pub const FORBIDDEN: &str = "Not enough permissions";

pub const EMAIL_CONFIRMED: &str = "Email confirmed";
pub const EMAIL_ALREADY_CONFIRMED: &str = "Your email is already confirmed";
pub const EMAIL_NOT_CONFIRMED: &str = "Email is not confirmed";
pub const CHECK_YOUR_EMAIL: &str = "Check your email for confirmation";
pub const VERIFICATION_ERROR: &str = "Verification error";
pub const INVALID_EMAIL_TOKEN: &str = "Invalid token for email verification";

pub const INVALID_OR_EXPIRED_TOKEN: &str = "Invalid or expired token";
pub const USER_WITH_SUCH_EMAIL_NOT_FOUND: &str = "User with such email not found";
pub const PASSWORD_CHANGED: &str = "Password changed successfully";

pub const CONTACT_NOT_FOUND: &str = "Contact not found";
pub const TOO_MANY_REQUESTS: &str = "Rate limit exceeded, try again later";

/// Rejection text for a duplicate contact
pub fn contact_exists(email: &str, phone_number: &str) -> String {
    format!("Contact with '{email}' email or '{phone_number}' phone number already exists.")
}
