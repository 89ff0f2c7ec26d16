//! Seed the database with sample users and microposts.
//!
//! The seed file lists explicit users, a batch of generated users and how
//! many microposts to write for the first few of them. Users whose email is
//! already registered are skipped, so seeding twice is harmless for users
//! (microposts are added again).

use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use sample_app_web::models::{MicropostForm, User, UserForm};
use sample_app_web::services::{MicropostService, UserError, UserService};

use super::connect;

/// Top-level seed file.
#[derive(Debug, Deserialize)]
pub struct SeedFile {
    #[serde(default)]
    pub users: Vec<SeedUser>,
    #[serde(default)]
    pub generated_users: Option<GeneratedUsers>,
    #[serde(default)]
    pub microposts: Option<SeedMicroposts>,
}

/// One explicitly listed user.
#[derive(Debug, Deserialize)]
pub struct SeedUser {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub admin: bool,
}

/// `count` users named `"{name_prefix} {n}"` with emails built from
/// `email_pattern`, where `{n}` is replaced by 1..=count.
#[derive(Debug, Deserialize)]
pub struct GeneratedUsers {
    pub count: usize,
    pub name_prefix: String,
    pub email_pattern: String,
    pub password: String,
}

impl GeneratedUsers {
    /// Expand into concrete users.
    #[must_use]
    pub fn expand(&self) -> Vec<SeedUser> {
        (1..=self.count)
            .map(|n| SeedUser {
                name: format!("{} {n}", self.name_prefix),
                email: self.email_pattern.replace("{n}", &n.to_string()),
                password: self.password.clone(),
                admin: false,
            })
            .collect()
    }
}

/// Microposts written for the first `users` seeded users.
///
/// Each user gets `per_user` posts, cycling through `content`.
#[derive(Debug, Deserialize)]
pub struct SeedMicroposts {
    pub users: usize,
    pub per_user: usize,
    pub content: Vec<String>,
}

/// Parse and sanity-check a seed file's contents.
///
/// # Errors
///
/// Returns an error for malformed YAML, or micropost settings without any
/// content to post.
pub fn parse(yaml: &str) -> Result<SeedFile, Box<dyn std::error::Error>> {
    let seed: SeedFile = serde_yaml::from_str(yaml)?;

    if let Some(posts) = &seed.microposts
        && posts.per_user > 0
        && posts.content.is_empty()
    {
        return Err("microposts.content must not be empty".into());
    }

    Ok(seed)
}

/// Seed from the YAML file at `file_path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or a database
/// operation fails. Invalid seed users are logged and skipped.
pub async fn run(file_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("File not found: {file_path}").into());
    }

    info!(path = %file_path, "Loading seed file");

    // Parse before connecting to the database
    let content = tokio::fs::read_to_string(path).await?;
    let seed = parse(&content)?;

    let pool = connect().await?;
    let users = UserService::new(&pool);
    let microposts = MicropostService::new(&pool);

    let mut all_users: Vec<SeedUser> = seed.users;
    if let Some(generated) = &seed.generated_users {
        all_users.extend(generated.expand());
    }

    let mut created = 0usize;
    let mut seeded: Vec<User> = Vec::with_capacity(all_users.len());

    for entry in &all_users {
        if let Some(existing) = users.find_by_email(&entry.email).await? {
            seeded.push(existing);
            continue;
        }

        let form = UserForm::new(&entry.name, &entry.email, &entry.password);
        match users.register(&form).await {
            Ok(user) => {
                if entry.admin {
                    users.set_admin(user.id, true).await?;
                }
                created += 1;
                seeded.push(user);
            }
            Err(UserError::Invalid(errors)) => {
                warn!(email = %entry.email, "Skipping invalid seed user: {errors}");
            }
            Err(e) => return Err(e.into()),
        }
    }

    let mut posts = 0usize;
    if let Some(plan) = &seed.microposts {
        for user in seeded.iter().take(plan.users) {
            for content in plan.content.iter().cycle().take(plan.per_user) {
                let form = MicropostForm {
                    content: content.clone(),
                };
                microposts.create(user.id, &form).await?;
                posts += 1;
            }
        }
    }

    info!("Seeding complete!");
    info!("  Users created: {created}");
    info!("  Users already present: {}", seeded.len() - created);
    info!("  Microposts created: {posts}");

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
users:
  - name: Example User
    email: example@railstutorial.org
    password: foobar
    admin: true
generated_users:
  count: 3
  name_prefix: Sample User
  email_pattern: "example-{n}@railstutorial.org"
  password: password
microposts:
  users: 2
  per_user: 5
  content:
    - Lorem ipsum dolor sit amet.
"#;

    #[test]
    fn test_parse_sample() {
        let seed = parse(SAMPLE).unwrap();
        assert_eq!(seed.users.len(), 1);
        assert!(seed.users[0].admin);
        let posts = seed.microposts.unwrap();
        assert_eq!((posts.users, posts.per_user), (2, 5));
    }

    #[test]
    fn test_generated_users_expand() {
        let seed = parse(SAMPLE).unwrap();
        let users = seed.generated_users.unwrap().expand();
        assert_eq!(users.len(), 3);
        assert_eq!(users[0].name, "Sample User 1");
        assert_eq!(users[2].email, "example-3@railstutorial.org");
        assert!(users.iter().all(|u| !u.admin));
    }

    #[test]
    fn test_microposts_need_content() {
        let yaml = "microposts:\n  users: 1\n  per_user: 2\n  content: []\n";
        assert!(parse(yaml).is_err());
    }

    #[test]
    fn test_seed_file_checked_in_parses() {
        let yaml = include_str!("../../seeds/sample.yaml");
        let seed = parse(yaml).unwrap();
        assert!(seed.users.iter().any(|u| u.admin));
        assert!(seed.microposts.is_some());
    }
}
