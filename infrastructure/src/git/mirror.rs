//! git2-based adapter for the [`RepositoryMirror`] port.
//!
//! libgit2 calls are blocking, so every port method runs the underlying
//! operation on the blocking thread pool. The repository handle is not kept
//! across calls; each operation re-opens the repository, which keeps the
//! adapter `Send + Sync` without interior locking.

use async_trait::async_trait;
use crewboard_application::{MirrorError, RepositoryMirror};
use git2::{
    build::RepoBuilder, Cred, ErrorCode, FetchOptions, IndexAddOption, PushOptions,
    RemoteCallbacks, Repository, Signature,
};
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Settings for the local mirror of the project repository.
#[derive(Debug, Clone)]
pub struct MirrorSettings {
    pub repo_path: PathBuf,
    /// Remote to clone from when the local path does not exist yet.
    pub remote_url: Option<String>,
    pub author_name: String,
    pub author_email: String,
    /// Access token for authenticated push/pull, sent as the password of a
    /// basic-auth pair with username "git".
    pub token: Option<String>,
}

pub struct GitMirror {
    settings: Arc<MirrorSettings>,
}

impl GitMirror {
    /// Open the mirror at the configured path, cloning from the remote first
    /// if the path does not exist. Blocking; call during startup.
    pub fn open(settings: MirrorSettings) -> Result<Self, MirrorError> {
        if settings.repo_path.exists() {
            Repository::open(&settings.repo_path).map_err(git_err)?;
        } else {
            let remote = settings.remote_url.as_deref().ok_or_else(|| {
                MirrorError::InvalidPath(format!(
                    "{} does not exist and no remote URL is configured",
                    settings.repo_path.display()
                ))
            })?;
            info!(remote, path = %settings.repo_path.display(), "local mirror not found, cloning");
            let mut fetch = FetchOptions::new();
            fetch.remote_callbacks(callbacks(settings.token.clone()));
            RepoBuilder::new()
                .fetch_options(fetch)
                .clone(remote, &settings.repo_path)
                .map_err(git_err)?;
        }
        Ok(Self {
            settings: Arc::new(settings),
        })
    }

    async fn run_blocking<T, F>(&self, op: F) -> Result<T, MirrorError>
    where
        T: Send + 'static,
        F: FnOnce(&MirrorSettings) -> Result<T, MirrorError> + Send + 'static,
    {
        let settings = Arc::clone(&self.settings);
        tokio::task::spawn_blocking(move || op(&settings))
            .await
            .map_err(|e| MirrorError::Git(format!("blocking task failed: {}", e)))?
    }
}

#[async_trait]
impl RepositoryMirror for GitMirror {
    async fn read_all_files(&self) -> Result<BTreeMap<String, String>, MirrorError> {
        self.run_blocking(|settings| {
            let mut files = BTreeMap::new();
            collect_files(&settings.repo_path, &settings.repo_path, &mut files)?;
            Ok(files)
        })
        .await
    }

    async fn write_file(&self, path: &str, content: &[u8]) -> Result<(), MirrorError> {
        let relative = sanitize_relative(path)?;
        let content = content.to_vec();
        self.run_blocking(move |settings| {
            let full = settings.repo_path.join(relative);
            if let Some(parent) = full.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(full, content)?;
            Ok(())
        })
        .await
    }

    async fn commit(&self, message: &str) -> Result<(), MirrorError> {
        let message = message.to_string();
        self.run_blocking(move |settings| {
            let repo = Repository::open(&settings.repo_path).map_err(git_err)?;
            let mut index = repo.index().map_err(git_err)?;
            index
                .add_all(["."].iter(), IndexAddOption::DEFAULT, None)
                .map_err(git_err)?;
            index.write().map_err(git_err)?;

            let tree_id = index.write_tree().map_err(git_err)?;
            let tree = repo.find_tree(tree_id).map_err(git_err)?;
            let sig = Signature::now(&settings.author_name, &settings.author_email)
                .map_err(git_err)?;

            let parent = match repo.head() {
                Ok(head) => Some(head.peel_to_commit().map_err(git_err)?),
                Err(e) if e.code() == ErrorCode::UnbornBranch => None,
                Err(e) => return Err(git_err(e)),
            };
            let parents: Vec<&git2::Commit> = parent.iter().collect();

            let commit_id = repo
                .commit(Some("HEAD"), &sig, &sig, &message, &tree, &parents)
                .map_err(git_err)?;
            debug!(commit = %commit_id, "created mirror commit");
            Ok(())
        })
        .await
    }

    async fn push(&self) -> Result<(), MirrorError> {
        self.run_blocking(|settings| {
            let repo = Repository::open(&settings.repo_path).map_err(git_err)?;
            let head = repo.head().map_err(git_err)?;
            let branch = head
                .name()
                .ok_or_else(|| MirrorError::Git("HEAD is not a named reference".to_string()))?
                .to_string();

            let mut remote = repo.find_remote("origin").map_err(git_err)?;
            let mut options = PushOptions::new();
            options.remote_callbacks(callbacks(settings.token.clone()));
            let refspec = format!("{branch}:{branch}");
            remote.push(&[refspec], Some(&mut options)).map_err(git_err)?;
            debug!(branch, "pushed mirror branch");
            Ok(())
        })
        .await
    }

    async fn pull(&self) -> Result<(), MirrorError> {
        self.run_blocking(|settings| {
            let repo = Repository::open(&settings.repo_path).map_err(git_err)?;
            let mut remote = repo.find_remote("origin").map_err(git_err)?;
            let mut options = FetchOptions::new();
            options.remote_callbacks(callbacks(settings.token.clone()));
            remote
                .fetch(&[] as &[&str], Some(&mut options), None)
                .map_err(git_err)?;

            let fetch_head = repo.find_reference("FETCH_HEAD").map_err(git_err)?;
            let fetched = repo
                .reference_to_annotated_commit(&fetch_head)
                .map_err(git_err)?;
            let (analysis, _) = repo.merge_analysis(&[&fetched]).map_err(git_err)?;

            if analysis.is_up_to_date() {
                return Ok(());
            }
            if !analysis.is_fast_forward() {
                return Err(MirrorError::Git(
                    "remote has diverged, refusing non-fast-forward merge".to_string(),
                ));
            }

            let head_name = repo
                .head()
                .map_err(git_err)?
                .name()
                .ok_or_else(|| MirrorError::Git("HEAD is not a named reference".to_string()))?
                .to_string();
            let mut reference = repo.find_reference(&head_name).map_err(git_err)?;
            reference
                .set_target(fetched.id(), "fast-forward pull")
                .map_err(git_err)?;
            repo.set_head(&head_name).map_err(git_err)?;
            let mut checkout = git2::build::CheckoutBuilder::new();
            checkout.force();
            repo.checkout_head(Some(&mut checkout)).map_err(git_err)?;
            debug!(branch = head_name, "fast-forwarded mirror");
            Ok(())
        })
        .await
    }
}

fn git_err(e: git2::Error) -> MirrorError {
    MirrorError::Git(e.message().to_string())
}

fn callbacks(token: Option<String>) -> RemoteCallbacks<'static> {
    let mut callbacks = RemoteCallbacks::new();
    if let Some(token) = token {
        callbacks.credentials(move |_url, _username, _allowed| {
            Cred::userpass_plaintext("git", &token)
        });
    }
    callbacks
}

/// Reject absolute paths and parent-directory escapes before joining onto
/// the mirror root.
fn sanitize_relative(path: &str) -> Result<PathBuf, MirrorError> {
    let candidate = Path::new(path);
    let escapes = candidate.components().any(|component| {
        !matches!(component, Component::Normal(_) | Component::CurDir)
    });
    if path.is_empty() || escapes {
        return Err(MirrorError::InvalidPath(path.to_string()));
    }
    Ok(candidate.to_path_buf())
}

fn collect_files(
    root: &Path,
    dir: &Path,
    files: &mut BTreeMap<String, String>,
) -> Result<(), MirrorError> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            if entry.file_name() == ".git" {
                continue;
            }
            collect_files(root, &path, files)?;
        } else {
            let data = std::fs::read(&path)?;
            let Ok(text) = String::from_utf8(data) else {
                debug!(path = %path.display(), "skipping non-UTF-8 file");
                continue;
            };
            let relative = path
                .strip_prefix(root)
                .map_err(|_| MirrorError::InvalidPath(path.display().to_string()))?;
            let key = relative
                .components()
                .filter_map(|c| c.as_os_str().to_str())
                .collect::<Vec<_>>()
                .join("/");
            files.insert(key, text);
        }
    }
    Ok(())
}
