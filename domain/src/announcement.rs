use crate::announcements::Model;
use crate::error::Error;
use crate::{require_owner_or_admin, require_staff, Id};
use entity::users::Model as User;
use events::{DomainEvent, EventPublisher};
use log::*;
use sea_orm::DatabaseConnection;

pub use entity_api::announcement::{find_all, find_by_id};

/// Create an announcement authored by `user` and broadcast it. The event is
/// published only after the insert has been acknowledged, and carries the
/// resolved record (author name populated) so clients need no follow-up
/// fetch.
pub async fn create(
    db: &DatabaseConnection,
    publisher: &EventPublisher,
    model: Model,
    user: &User,
) -> Result<Model, Error> {
    require_staff(user)?;

    let announcement = entity_api::announcement::create(db, model, user.id).await?;

    publisher
        .publish(DomainEvent::AnnouncementCreated {
            announcement: serde_json::to_value(&announcement)?,
        })
        .await;

    Ok(announcement)
}

pub async fn update(
    db: &DatabaseConnection,
    publisher: &EventPublisher,
    id: Id,
    model: Model,
    user: &User,
) -> Result<Model, Error> {
    require_staff(user)?;

    let existing = entity_api::announcement::find_by_id(db, id).await?;
    require_owner_or_admin(user, existing.author_id)?;

    let announcement = entity_api::announcement::update(db, id, model).await?;

    publisher
        .publish(DomainEvent::AnnouncementUpdated {
            announcement: serde_json::to_value(&announcement)?,
        })
        .await;

    Ok(announcement)
}

pub async fn delete(
    db: &DatabaseConnection,
    publisher: &EventPublisher,
    id: Id,
    user: &User,
) -> Result<(), Error> {
    require_staff(user)?;

    let existing = entity_api::announcement::find_by_id(db, id).await?;
    require_owner_or_admin(user, existing.author_id)?;

    entity_api::announcement::delete_by_id(db, id).await?;

    debug!("Announcement {id} deleted, publishing broadcast");

    publisher
        .publish(DomainEvent::AnnouncementDeleted {
            announcement_id: id,
        })
        .await;

    Ok(())
}
