//! `guarita-auth` — pure authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage. It turns a
//! bearer credential into verified claims, claims into an authenticated
//! identity (re-read from the user directory, never trusted from the token),
//! and answers "may identity X perform action A on module M?" against the
//! profile → roles → permissions → modules graph.

pub mod claims;
pub mod directory;
pub mod graph;
pub mod identity;
pub mod policy;
pub mod verifier;

pub use claims::{Claims, validate_claims};
pub use directory::{DirectoryError, UserDirectory, UsuarioRegistro};
pub use graph::{Grant, PermissionGraph};
pub use identity::{AuthenticatedIdentity, IdentityResolver, ResolveError};
pub use policy::{Modulo, Perfil, Permissao, PolicyError, PolicyStore, Role};
pub use verifier::{TokenConfig, TokenVerifier, VerifyError};
