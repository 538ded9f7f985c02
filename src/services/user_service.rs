use crate::db::Collections;
use crate::error::AppError;
use crate::models::{Class, Role, User};
use crate::services::permission::assert_class_role;

pub struct UserService {
    collections: Collections,
}

impl UserService {
    pub fn new(collections: Collections) -> Self {
        Self { collections }
    }

    pub async fn get_user(&self, uid: &str) -> Result<User, AppError> {
        self.collections.require_user(uid).await
    }

    /// Rename without a guard: callers authenticate the acting identity
    /// upstream, and a user can only reach their own record there.
    pub async fn update_user_name(&self, uid: &str, name: &str) -> Result<(), AppError> {
        self.collections.users.update_name(uid, name).await?;
        Ok(())
    }

    /// Unguarded membership listing for in-crate callers (the notifier).
    pub async fn list_class_members(&self, class: &Class, role: Role) -> Result<Vec<User>, AppError> {
        self.collections.users.find_by_class_role(class, role).await
    }

    /// Guarded membership listing. Visibility is asymmetric: staff may see
    /// the students of their class, while any member of a class may see
    /// its instructors and TAs.
    pub async fn get_users_from_class(
        &self,
        uid: &str,
        class: &Class,
        role: Role,
    ) -> Result<Vec<User>, AppError> {
        let user = self.collections.require_user(uid).await?;
        if role == Role::Student {
            assert_class_role(
                &user,
                class,
                &[Role::Instructor, Role::Ta],
                &format!("viewing students in class {}", class.course),
            )?;
        } else {
            assert_class_role(
                &user,
                class,
                &[Role::Student, Role::Instructor, Role::Ta],
                &format!("viewing instructors/TAs in class {}", class.course),
            )?;
        }
        self.list_class_members(class, role).await
    }
}
