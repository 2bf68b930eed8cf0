use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::user::errors::UserError;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;
use crate::domain::user::ports::UserServicePort;

/// Domain service implementation for user operations.
///
/// Concrete implementation of UserServicePort with dependency injection.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    password_hasher: auth::PasswordHasher,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    pub fn new(repository: Arc<UR>) -> Self {
        Self {
            repository,
            password_hasher: auth::PasswordHasher::new(),
        }
    }

    async fn ensure_email_available(
        &self,
        email: &EmailAddress,
        owner: Option<&UserId>,
    ) -> Result<(), UserError> {
        match self.repository.find_by_email(email.as_str()).await? {
            Some(existing) if Some(&existing.id) != owner => {
                Err(UserError::EmailAlreadyExists(email.to_string()))
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn create_user(&self, command: CreateUserCommand) -> Result<User, UserError> {
        self.ensure_email_available(&command.email, None).await?;

        let password_hash = self.password_hasher.hash(&command.password)?;

        let mut user = User::new(
            command.email,
            command.full_name,
            password_hash,
            command.is_verified,
        );
        user.is_superuser = command.is_superuser;

        let created_user = self.repository.create(user).await?;
        tracing::info!(user_id = %created_user.id, email = %created_user.email, "User created");

        Ok(created_user)
    }

    async fn get_user(&self, id: &UserId) -> Result<User, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }

    async fn list_users(&self, offset: i64, limit: i64) -> Result<Vec<User>, UserError> {
        self.repository.list(offset, limit).await
    }

    async fn update_user(
        &self,
        id: &UserId,
        command: UpdateUserCommand,
    ) -> Result<User, UserError> {
        let mut user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))?;

        if let Some(new_email) = command.email {
            self.ensure_email_available(&new_email, Some(id)).await?;
            user.email = new_email;
        }

        if let Some(new_full_name) = command.full_name {
            user.full_name = Some(new_full_name);
        }

        if let Some(new_password) = command.password {
            user.password_hash = self.password_hasher.hash(&new_password)?;
        }

        let updated_user = self.repository.update(user).await?;
        tracing::info!(user_id = %updated_user.id, "User updated");

        Ok(updated_user)
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), UserError> {
        self.repository.delete(id).await?;
        tracing::info!(user_id = %id, "User deleted");

        Ok(())
    }

    async fn ensure_superuser(
        &self,
        email: EmailAddress,
        password: String,
    ) -> Result<User, UserError> {
        if let Some(existing) = self.repository.find_by_email(email.as_str()).await? {
            tracing::debug!(email = %email, "Superuser already present");
            return Ok(existing);
        }

        self.create_user(CreateUserCommand {
            email,
            full_name: None,
            password,
            is_superuser: true,
            is_verified: true,
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use mockall::mock;

    use super::*;

    mock! {
        pub TestUserRepository {}

        #[async_trait]
        impl UserRepository for TestUserRepository {
            async fn create(&self, user: User) -> Result<User, UserError>;
            async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;
            async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError>;
            async fn list(&self, offset: i64, limit: i64) -> Result<Vec<User>, UserError>;
            async fn update(&self, user: User) -> Result<User, UserError>;
            async fn delete(&self, id: &UserId) -> Result<(), UserError>;
        }
    }

    fn sample_user(email: &str) -> User {
        User {
            id: UserId::new(),
            email: EmailAddress::new(email.to_string()).unwrap(),
            full_name: None,
            password_hash: "$argon2id$test_hash".to_string(),
            is_active: true,
            is_superuser: false,
            is_verified: false,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_user_success() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));
        repository
            .expect_create()
            .withf(|user| {
                user.email.as_str() == "admin@example.com"
                    && user.is_superuser
                    && user.is_verified
                    && user.password_hash.starts_with("$argon2")
            })
            .times(1)
            .returning(|user| Ok(user));

        let service = UserService::new(Arc::new(repository));

        let user = service
            .create_user(CreateUserCommand {
                email: EmailAddress::new("admin@example.com".to_string()).unwrap(),
                full_name: Some("Admin".to_string()),
                password: "password123".to_string(),
                is_superuser: true,
                is_verified: true,
            })
            .await
            .unwrap();

        assert_eq!(user.full_name.as_deref(), Some("Admin"));
        assert!(user.is_active);
    }

    #[tokio::test]
    async fn test_create_user_duplicate_email() {
        let mut repository = MockTestUserRepository::new();

        let existing = sample_user("taken@example.com");
        repository
            .expect_find_by_email()
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));
        repository.expect_create().times(0);

        let service = UserService::new(Arc::new(repository));

        let result = service
            .create_user(CreateUserCommand {
                email: EmailAddress::new("taken@example.com".to_string()).unwrap(),
                full_name: None,
                password: "password123".to_string(),
                is_superuser: false,
                is_verified: false,
            })
            .await;

        assert!(matches!(result, Err(UserError::EmailAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));

        let service = UserService::new(Arc::new(repository));

        let result = service.get_user(&UserId::new()).await;
        assert!(matches!(result, Err(UserError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_users_forwards_paging() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_list()
            .withf(|offset, limit| *offset == 10 && *limit == 5)
            .times(1)
            .returning(|_, _| Ok(vec![sample_user("a@example.com")]));

        let service = UserService::new(Arc::new(repository));

        let users = service.list_users(10, 5).await.unwrap();
        assert_eq!(users.len(), 1);
    }

    #[tokio::test]
    async fn test_update_user_rehashes_password() {
        let mut repository = MockTestUserRepository::new();

        let existing = sample_user("old@example.com");
        let user_id = existing.id;
        repository
            .expect_find_by_id()
            .withf(move |id| *id == user_id)
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));
        repository
            .expect_find_by_email()
            .withf(|email| email == "new@example.com")
            .times(1)
            .returning(|_| Ok(None));
        repository
            .expect_update()
            .withf(|user| {
                user.email.as_str() == "new@example.com"
                    && user.full_name.as_deref() == Some("New Name")
                    && user.password_hash.starts_with("$argon2id$")
                    && user.password_hash != "$argon2id$test_hash"
            })
            .times(1)
            .returning(|user| Ok(user));

        let service = UserService::new(Arc::new(repository));

        let command = UpdateUserCommand {
            email: Some(EmailAddress::new("new@example.com".to_string()).unwrap()),
            full_name: Some("New Name".to_string()),
            password: Some("newpassword".to_string()),
        };

        let updated = service.update_user(&user_id, command).await.unwrap();
        assert_eq!(updated.email.as_str(), "new@example.com");
    }

    #[tokio::test]
    async fn test_update_user_email_taken_by_other() {
        let mut repository = MockTestUserRepository::new();

        let existing = sample_user("me@example.com");
        let other = sample_user("other@example.com");
        let user_id = existing.id;
        repository
            .expect_find_by_id()
            .returning(move |_| Ok(Some(existing.clone())));
        repository
            .expect_find_by_email()
            .returning(move |_| Ok(Some(other.clone())));
        repository.expect_update().times(0);

        let service = UserService::new(Arc::new(repository));

        let command = UpdateUserCommand {
            email: Some(EmailAddress::new("other@example.com".to_string()).unwrap()),
            ..Default::default()
        };

        let result = service.update_user(&user_id, command).await;
        assert!(matches!(result, Err(UserError::EmailAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_update_user_not_found() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));
        repository.expect_update().times(0);

        let service = UserService::new(Arc::new(repository));

        let command = UpdateUserCommand {
            full_name: Some("Nobody".to_string()),
            ..Default::default()
        };

        let result = service.update_user(&UserId::new(), command).await;
        assert!(matches!(result, Err(UserError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_user_not_found() {
        let mut repository = MockTestUserRepository::new();

        let user_id = UserId::new();
        repository
            .expect_delete()
            .times(1)
            .returning(move |_| Err(UserError::NotFound(user_id.to_string())));

        let service = UserService::new(Arc::new(repository));

        let result = service.delete_user(&user_id).await;
        assert!(matches!(result, Err(UserError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_ensure_superuser_keeps_existing_account() {
        let mut repository = MockTestUserRepository::new();

        let existing = sample_user("admin@example.com");
        let existing_id = existing.id;
        repository
            .expect_find_by_email()
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));
        repository.expect_create().times(0);

        let service = UserService::new(Arc::new(repository));

        let user = service
            .ensure_superuser(
                EmailAddress::new("admin@example.com".to_string()).unwrap(),
                "password".to_string(),
            )
            .await
            .unwrap();

        assert_eq!(user.id, existing_id);
    }
}
