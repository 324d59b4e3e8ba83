use std::fs;
use std::path::{Path, PathBuf};

use git2::{Oid, Repository, RepositoryInitOptions, Signature};
use tempfile::TempDir;

const BRANCH: &str = "main";

pub fn init_bare_repo(path: &Path) -> Result<Repository, String> {
    let mut opts = RepositoryInitOptions::new();
    opts.bare(true).initial_head(BRANCH);
    Repository::init_opts(path, &opts)
        .map_err(|err| format!("git init --bare failed for {path:?}: {err}"))
}

pub fn init_repo(path: &Path) -> Result<Repository, String> {
    let mut opts = RepositoryInitOptions::new();
    opts.initial_head(BRANCH);
    let repo = Repository::init_opts(path, &opts)
        .map_err(|err| format!("git init failed for {path:?}: {err}"))?;
    configure_test_repo(&repo)?;
    Ok(repo)
}

pub fn clone_repo(remote_dir: &Path, path: &Path) -> Result<Repository, String> {
    let url = path_url(remote_dir)?;
    let repo = Repository::clone(url, path)
        .map_err(|err| format!("git clone {url} failed: {err}"))?;
    configure_test_repo(&repo)?;
    Ok(repo)
}

/// Write `name` and commit it on HEAD. Returns the new commit id.
pub fn commit_file(repo: &Repository, name: &str, contents: &str) -> Result<Oid, String> {
    let workdir = repo
        .workdir()
        .ok_or_else(|| "bare repository has no workdir".to_string())?;
    fs::write(workdir.join(name), contents).map_err(|err| format!("write {name} failed: {err}"))?;

    let mut index = repo.index().map_err(|err| format!("open index failed: {err}"))?;
    index
        .add_path(Path::new(name))
        .map_err(|err| format!("git add {name} failed: {err}"))?;
    index.write().map_err(|err| format!("write index failed: {err}"))?;
    let tree_id = index
        .write_tree()
        .map_err(|err| format!("write tree failed: {err}"))?;
    let tree = repo
        .find_tree(tree_id)
        .map_err(|err| format!("find tree failed: {err}"))?;

    let sig = Signature::now("Test", "test@test.com").map_err(|err| err.to_string())?;
    let parent = match repo.head() {
        Ok(head) => Some(
            head.peel_to_commit()
                .map_err(|err| format!("peel HEAD failed: {err}"))?,
        ),
        Err(_) => None,
    };
    let parents: Vec<_> = parent.iter().collect();
    repo.commit(Some("HEAD"), &sig, &sig, &format!("add {name}"), &tree, &parents)
        .map_err(|err| format!("git commit failed: {err}"))
}

/// `git push origin main`, the code push chats depend on.
pub fn push_branch(repo: &Repository) -> Result<(), String> {
    let mut remote = repo
        .find_remote("origin")
        .map_err(|err| format!("find origin failed: {err}"))?;
    let refspec = format!("refs/heads/{BRANCH}:refs/heads/{BRANCH}");
    remote
        .push(&[refspec.as_str()], None)
        .map_err(|err| format!("git push origin {BRANCH} failed: {err}"))
}

pub fn ref_target(repo_dir: &Path, refname: &str) -> Result<Option<Oid>, String> {
    let repo = Repository::open(repo_dir)
        .map_err(|err| format!("open repo failed for {repo_dir:?}: {err}"))?;
    Ok(repo.find_reference(refname).ok().and_then(|r| r.target()))
}

fn configure_test_repo(repo: &Repository) -> Result<(), String> {
    let mut cfg = repo
        .config()
        .map_err(|err| format!("open repo config failed: {err}"))?;
    cfg.set_str("user.name", "Test")
        .map_err(|err| format!("set user.name failed: {err}"))?;
    cfg.set_str("user.email", "test@test.com")
        .map_err(|err| format!("set user.email failed: {err}"))?;
    Ok(())
}

fn path_url(path: &Path) -> Result<&str, String> {
    path.to_str()
        .ok_or_else(|| format!("path is not utf8: {path:?}"))
}

/// A bare `origin` seeded with one commit on `main`, plus any number of
/// clones of it. Everything lives under one temp dir.
pub struct Rig {
    dir: TempDir,
    pub remote: PathBuf,
    /// Commit every clone shares.
    pub base: Oid,
}

impl Rig {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let remote = dir.path().join("origin.git");
        init_bare_repo(&remote).expect("init remote");

        let seed_dir = dir.path().join("seed");
        let seed = init_repo(&seed_dir).expect("init seed");
        seed.remote("origin", path_url(&remote).expect("utf8 path"))
            .expect("add origin");
        let base = commit_file(&seed, "README.md", "hello\n").expect("seed commit");
        push_branch(&seed).expect("push seed");

        Self { dir, remote, base }
    }

    pub fn clone_as(&self, name: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        clone_repo(&self.remote, &path).expect("clone");
        path
    }

    /// A directory for per-test config, outside every repository.
    pub fn config_dir(&self) -> PathBuf {
        let path = self.dir.path().join("config");
        fs::create_dir_all(&path).expect("create config dir");
        path
    }
}
