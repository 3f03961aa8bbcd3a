use super::error::{EntityApiErrorKind, Error};
use entity::announcements::{ActiveModel, Column, Entity, Model};
use entity::{users, Id};
use sea_orm::{
    entity::prelude::*,
    ActiveValue::{Set, Unchanged},
    DatabaseConnection, QueryOrder, TryIntoModel,
};

use log::*;

pub async fn create(
    db: &DatabaseConnection,
    announcement_model: Model,
    author_id: Id,
) -> Result<Model, Error> {
    debug!("New Announcement Model to be inserted: {announcement_model:?}");

    let now = chrono::Utc::now();

    let announcement_active_model: ActiveModel = ActiveModel {
        title: Set(announcement_model.title),
        content: Set(announcement_model.content),
        author_id: Set(author_id),
        image: Set(announcement_model.image),
        department: Set(announcement_model.department),
        priority: Set(announcement_model.priority),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    let announcement = announcement_active_model.save(db).await?.try_into_model()?;

    with_author(db, announcement).await
}

pub async fn update(db: &DatabaseConnection, id: Id, model: Model) -> Result<Model, Error> {
    let result = Entity::find_by_id(id).one(db).await?;

    match result {
        Some(announcement) => {
            debug!("Existing Announcement model to be Updated: {announcement:?}");

            let active_model: ActiveModel = ActiveModel {
                id: Unchanged(announcement.id),
                title: Set(model.title),
                content: Set(model.content),
                author_id: Unchanged(announcement.author_id),
                image: Set(model.image),
                department: Set(model.department),
                priority: Set(model.priority),
                created_at: Unchanged(announcement.created_at),
                updated_at: Set(chrono::Utc::now().into()),
            };

            let updated = active_model.update(db).await?.try_into_model()?;

            with_author(db, updated).await
        }
        None => {
            debug!("Announcement with id {id} not found");

            Err(Error {
                source: None,
                error_kind: EntityApiErrorKind::RecordNotFound,
            })
        }
    }
}

pub async fn delete_by_id(db: &DatabaseConnection, id: Id) -> Result<(), Error> {
    let result = find_by_id(db, id).await?;

    result.delete(db).await?;
    Ok(())
}

pub async fn find_by_id(db: &DatabaseConnection, id: Id) -> Result<Model, Error> {
    let announcement = Entity::find_by_id(id).one(db).await?.ok_or_else(|| Error {
        source: None,
        error_kind: EntityApiErrorKind::RecordNotFound,
    })?;

    with_author(db, announcement).await
}

/// All announcements, newest first. This ordering is the collection's
/// natural ordering key and must match what connected clients maintain
/// locally when applying broadcast events.
pub async fn find_all(db: &DatabaseConnection) -> Result<Vec<Model>, Error> {
    let results = Entity::find()
        .find_also_related(users::Entity)
        .order_by_desc(Column::CreatedAt)
        .all(db)
        .await?;

    Ok(results
        .into_iter()
        .map(|(mut announcement, author)| {
            announcement.author_name = author.map(|a| a.name);
            announcement
        })
        .collect())
}

async fn with_author(db: &DatabaseConnection, mut announcement: Model) -> Result<Model, Error> {
    let author = users::Entity::find_by_id(announcement.author_id)
        .one(db)
        .await?;

    announcement.author_name = author.map(|a| a.name);
    Ok(announcement)
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use entity::announcements::{Model, Priority};
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn author_model(id: Id) -> users::Model {
        let now = chrono::Utc::now();
        users::Model {
            id,
            name: "Dr. Ada".to_owned(),
            email: "ada@example.edu".to_owned(),
            password: "hash".to_owned(),
            role: users::Role::Staff,
            department: Some("Computer Science".to_owned()),
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn create_returns_a_new_announcement_model() -> Result<(), Error> {
        let now = chrono::Utc::now();
        let author_id = Id::new_v4();

        let announcement_model = Model {
            id: Id::new_v4(),
            title: "Exam timetable released".to_owned(),
            content: "Check the board for details".to_owned(),
            author_id,
            image: None,
            department: "General".to_owned(),
            priority: Priority::Normal,
            created_at: now.into(),
            updated_at: now.into(),
            author_name: None,
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![announcement_model.clone()]])
            .append_query_results(vec![vec![author_model(author_id)]])
            .into_connection();

        let announcement = create(&db, announcement_model.clone(), author_id).await?;

        assert_eq!(announcement.id, announcement_model.id);
        assert_eq!(announcement.author_name, Some("Dr. Ada".to_owned()));

        Ok(())
    }

    #[tokio::test]
    async fn find_by_id_returns_not_found_for_missing_record() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<Model>::new()])
            .into_connection();

        let result = find_by_id(&db, Id::new_v4()).await;

        assert_eq!(
            result.unwrap_err().error_kind,
            EntityApiErrorKind::RecordNotFound
        );
    }
}
