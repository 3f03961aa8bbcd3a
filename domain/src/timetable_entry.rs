use crate::error::Error;
use crate::timetable_entries::Model;
use crate::{require_staff, Id};
use entity::users::Model as User;
use events::{DomainEvent, EventPublisher};
use log::*;
use sea_orm::DatabaseConnection;

pub use entity_api::timetable_entry::{find_all, find_by_id};

// Timetable entries are department data rather than personal posts, so any
// staff member may edit any entry; there is no per-record ownership check.

pub async fn create(
    db: &DatabaseConnection,
    publisher: &EventPublisher,
    model: Model,
    user: &User,
) -> Result<Model, Error> {
    require_staff(user)?;

    let entry = entity_api::timetable_entry::create(db, model, user.id).await?;

    publisher
        .publish(DomainEvent::TimetableEntryCreated {
            entry: serde_json::to_value(&entry)?,
        })
        .await;

    Ok(entry)
}

pub async fn update(
    db: &DatabaseConnection,
    publisher: &EventPublisher,
    id: Id,
    model: Model,
    user: &User,
) -> Result<Model, Error> {
    require_staff(user)?;

    let entry = entity_api::timetable_entry::update(db, id, model).await?;

    publisher
        .publish(DomainEvent::TimetableEntryUpdated {
            entry: serde_json::to_value(&entry)?,
        })
        .await;

    Ok(entry)
}

pub async fn delete(
    db: &DatabaseConnection,
    publisher: &EventPublisher,
    id: Id,
    user: &User,
) -> Result<(), Error> {
    require_staff(user)?;

    entity_api::timetable_entry::delete_by_id(db, id).await?;

    debug!("TimetableEntry {id} deleted, publishing broadcast");

    publisher
        .publish(DomainEvent::TimetableEntryDeleted { entry_id: id })
        .await;

    Ok(())
}
