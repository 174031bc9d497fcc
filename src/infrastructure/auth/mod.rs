mod capability;
mod claims;
mod jwt;

pub use capability::{is_allowed, Capability, PermissionPolicy};
pub use claims::Claims;
pub use jwt::JwtValidator;
