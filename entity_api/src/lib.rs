//! Persistence operations for the noticeboard entities.
//!
//! Each module maps an entity to its create/read/update/delete operations
//! against a `DatabaseConnection`. Index queries return collections already
//! sorted by the kind's natural ordering so that callers (and the broadcast
//! mirror on the client side) share a single definition of display order.

use chrono::{Duration, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set, TryIntoModel};
use user::generate_hash;

pub mod announcement;
pub mod campus_event;
pub mod error;
pub mod timetable_entry;
pub mod user;

pub use entity::{announcements, campus_events, timetable_entries, users, Id};

/// Seeds a fresh database with a handful of accounts and board content for
/// local development. Not used by the server itself; see the seed_db binary.
pub async fn seed_database(db: &DatabaseConnection) {
    let now = Utc::now();

    let admin: users::Model = users::ActiveModel {
        name: Set("Board Admin".to_owned()),
        email: Set("admin@noticeboard.edu".to_owned()),
        password: Set(generate_hash("change-me-on-first-login".to_owned())),
        role: Set(users::Role::Admin),
        department: Set(None),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    }
    .save(db)
    .await
    .unwrap()
    .try_into_model()
    .unwrap();

    let staff: users::Model = users::ActiveModel {
        name: Set("Dr. Grace Okafor".to_owned()),
        email: Set("g.okafor@noticeboard.edu".to_owned()),
        password: Set(generate_hash("password".to_owned())),
        role: Set(users::Role::Staff),
        department: Set(Some("Computer Science".to_owned())),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    }
    .save(db)
    .await
    .unwrap()
    .try_into_model()
    .unwrap();

    users::ActiveModel {
        name: Set("Sam Student".to_owned()),
        email: Set("sam@student.noticeboard.edu".to_owned()),
        password: Set(generate_hash("password".to_owned())),
        role: Set(users::Role::Student),
        department: Set(Some("Computer Science".to_owned())),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    }
    .save(db)
    .await
    .unwrap();

    announcements::ActiveModel {
        title: Set("Welcome to the new semester".to_owned()),
        content: Set("Lectures start Monday. Check the timetable for your level.".to_owned()),
        author_id: Set(staff.id),
        image: Set(None),
        department: Set("General".to_owned()),
        priority: Set(announcements::Priority::High),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    }
    .save(db)
    .await
    .unwrap();

    campus_events::ActiveModel {
        title: Set("Departmental Orientation".to_owned()),
        description: Set("Orientation for new students, all levels welcome.".to_owned()),
        start_date: Set((now + Duration::days(7)).into()),
        end_date: Set((now + Duration::days(7) + Duration::hours(2)).into()),
        venue: Set("Main Auditorium".to_owned()),
        organizer_id: Set(admin.id),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    }
    .save(db)
    .await
    .unwrap();

    timetable_entries::ActiveModel {
        course_code: Set("CSC101".to_owned()),
        course_title: Set("Introduction to Computer Science".to_owned()),
        day_of_week: Set(timetable_entries::DayOfWeek::Monday),
        start_time: Set("09:00".to_owned()),
        end_time: Set("11:00".to_owned()),
        venue: Set("LT1".to_owned()),
        lecturer: Set(Some(staff.name.clone())),
        department: Set("Computer Science".to_owned()),
        level: Set(100),
        created_by: Set(staff.id),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    }
    .save(db)
    .await
    .unwrap();
}
