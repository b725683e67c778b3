use chrono::Utc;
use sheet_types::{Role, UserProfile};

use crate::{DocumentStore, StoreError, USERS};

#[derive(Clone, Debug, Default)]
pub struct UserUpdate {
    pub display_name: Option<String>,
    pub role: Option<Role>,
}

pub async fn create_user_doc(
    docs: &DocumentStore,
    uid: &str,
    email: &str,
    displayName: &str,
) -> Result<UserProfile, StoreError> {
    let now = Utc::now();
    let profile = UserProfile {
        uid: uid.to_string(),
        email: email.to_string(),
        display_name: displayName.to_string(),
        role: Role::User,
        created_at: now,
        updated_at: now,
    };
    docs.insert(USERS, uid, &profile).await?;
    Ok(profile)
}

pub async fn get_user_doc(docs: &DocumentStore, uid: &str) -> Result<Option<UserProfile>, StoreError> {
    docs.get(USERS, uid).await
}

/// Applies `update` and bumps `updated_at`, which never moves backwards.
pub async fn update_user_doc(
    docs: &DocumentStore,
    uid: &str,
    update: UserUpdate,
) -> Result<UserProfile, StoreError> {
    docs.transaction(|tx| {
        let mut profile: UserProfile = tx.fetch(USERS, uid)?;
        if let Some(name) = update.display_name {
            profile.display_name = name;
        }
        if let Some(role) = update.role {
            profile.role = role;
        }
        profile.updated_at = Utc::now().max(profile.updated_at).max(profile.created_at);
        tx.set(USERS, uid, &profile)?;
        Ok(profile)
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_and_read_back() {
        let docs = DocumentStore::in_memory();
        let created = create_user_doc(&docs, "u1", "ada@example.com", "Ada").await.unwrap();

        assert_eq!(created.role, Role::User);
        assert_eq!(get_user_doc(&docs, "u1").await.unwrap(), Some(created));
        assert!(get_user_doc(&docs, "nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn uid_is_unique() {
        let docs = DocumentStore::in_memory();
        create_user_doc(&docs, "u1", "a@example.com", "A").await.unwrap();
        assert!(create_user_doc(&docs, "u1", "b@example.com", "B").await.is_err());
    }

    #[tokio::test]
    async fn update_bumps_timestamp() {
        let docs = DocumentStore::in_memory();
        let created = create_user_doc(&docs, "u1", "ada@example.com", "Ada").await.unwrap();

        let updated = update_user_doc(
            &docs,
            "u1",
            UserUpdate {
                display_name: Some("Ada L.".into()),
                role: Some(Role::Admin),
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.display_name, "Ada L.");
        assert!(updated.role.is_admin());
        assert!(updated.updated_at >= created.updated_at);
        assert!(updated.updated_at >= updated.created_at);

        let missing = update_user_doc(&docs, "ghost", UserUpdate::default()).await;
        assert!(missing.unwrap_err().is_not_found());
    }
}
