use crate::{
    principal::{Principal, ROLE_ADMIN, ROLE_USER},
    schema::*,
    security::validation,
};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Identifiable, PartialEq)]
#[diesel(table_name = users)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub role: String,
    pub created_at: i64,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
struct InsertableUser<'a> {
    email: &'a str,
    role: &'a str,
    created_at: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NewUser {
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
}

#[derive(Debug, PartialEq)]
pub enum UserTableError {
    UserNotFound,
    EmailExists,
    InvalidEmail,
    DatabaseError,
    Unauthorized,
}

#[derive(Debug)]
pub enum UserQuery<'a> {
    Id(i32),
    Email(&'a str),
}

impl User {
    pub fn create(
        conn: &mut SqliteConnection,
        new_user: &NewUser,
        principal: &Principal,
    ) -> Result<User, UserTableError> {
        if !principal.is_admin() {
            log::warn!("User {} is not an admin", principal.user_id);
            return Err(UserTableError::Unauthorized);
        }

        if validation::validate_email(&new_user.email).is_err() {
            return Err(UserTableError::InvalidEmail);
        }

        if User::exists(conn, &new_user.email) {
            log::warn!("User with email {} already exists", new_user.email);
            return Err(UserTableError::EmailExists);
        }

        let user = InsertableUser {
            email: &new_user.email,
            role: if new_user.is_admin { ROLE_ADMIN } else { ROLE_USER },
            created_at: chrono::Utc::now().timestamp(),
        };

        use crate::schema::users::dsl::*;
        match diesel::insert_into(users).values(&user).get_result(conn) {
            Ok(in_db) => Ok(in_db),
            Err(err) => {
                log::error!("Failed to insert user into database: {:?}", err);
                Err(UserTableError::DatabaseError)
            }
        }
    }

    pub fn exists(conn: &mut SqliteConnection, query_email: &str) -> bool {
        use crate::schema::users::dsl::*;
        users
            .filter(email.eq(query_email))
            .first::<User>(conn)
            .is_ok()
    }

    pub fn get(conn: &mut SqliteConnection, query: UserQuery) -> Option<User> {
        use crate::schema::users::dsl::*;
        log::debug!("Getting user: {:?}", query);
        match query {
            UserQuery::Id(user_id) => users.filter(id.eq(user_id)).first::<User>(conn).ok(),
            UserQuery::Email(query_email) => users
                .filter(email.eq(query_email))
                .first::<User>(conn)
                .ok(),
        }
    }

    pub fn get_all_ids(conn: &mut SqliteConnection) -> Result<Vec<i32>, UserTableError> {
        use crate::schema::users::dsl::*;
        users.select(id).load::<i32>(conn).map_err(|err| {
            log::error!("Failed to get user ids: {:?}", err);
            UserTableError::DatabaseError
        })
    }

    pub fn get_all_admin(conn: &mut SqliteConnection) -> Result<Vec<User>, UserTableError> {
        use crate::schema::users::dsl::*;
        users
            .filter(role.eq(ROLE_ADMIN))
            .load::<User>(conn)
            .map_err(|err| {
                log::error!("Failed to get admins: {:?}", err);
                UserTableError::DatabaseError
            })
    }
}
