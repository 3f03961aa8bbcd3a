use crate::error::Error;
use crate::users::Model;
use sea_orm::DatabaseConnection;

pub use entity_api::user::{
    find_by_email, find_by_id, AuthSession, Backend, Credentials, Role,
};

/// Register a new user. Signup is open, but the role is always forced to
/// student; staff and admin roles are granted out of band.
pub async fn create(db: &DatabaseConnection, mut model: Model) -> Result<Model, Error> {
    model.role = Role::Student;
    Ok(entity_api::user::create(db, model).await?)
}
