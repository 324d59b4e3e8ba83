//! Note ref transfer over git2 remotes.

use std::cell::RefCell;

use git2::{Direction, ErrorCode, FetchOptions, Oid, PushOptions, Remote, RemoteCallbacks, Repository};
use tracing::{debug, info};

use super::repo::GitRepo;
use crate::core::{CommitId, LOCAL_NOTES_REF, Namespace, RemoteName};
use crate::store::{FetchOutcome, RemoteAccess, StoreError, TransportError};

/// Callbacks with ssh-agent and credential-helper authentication.
fn remote_callbacks<'a>(repo: &Repository) -> RemoteCallbacks<'a> {
    let cfg = repo.config().ok();
    let mut callbacks = RemoteCallbacks::new();
    callbacks.credentials(move |url, username_from_url, allowed| {
        if allowed.is_ssh_key()
            && let Some(user) = username_from_url
        {
            return git2::Cred::ssh_key_from_agent(user);
        }
        if allowed.is_user_pass_plaintext()
            && let Some(ref cfg) = cfg
            && let Ok(cred) = git2::Cred::credential_helper(cfg, url, username_from_url)
        {
            return Ok(cred);
        }
        git2::Cred::default()
    });
    callbacks
}

fn is_non_fast_forward(message: &str) -> bool {
    message.contains("non-fast-forward")
        || message.contains("non-fastforwardable")
        || message.contains("fetch first")
}

impl GitRepo {
    fn find_remote(&self, remote: &RemoteName) -> Result<Remote<'_>, TransportError> {
        self.repo
            .find_remote(remote.as_str())
            .map_err(|_| TransportError::UnknownRemote(remote.clone()))
    }

    /// Whether the remote currently advertises a chats notes ref.
    fn remote_has_notes(&self, remote: &RemoteName) -> Result<bool, TransportError> {
        let mut git_remote = self.find_remote(remote)?;
        let connect = |source| TransportError::Connect {
            remote: remote.clone(),
            source,
        };
        let connection = git_remote
            .connect_auth(Direction::Fetch, Some(remote_callbacks(&self.repo)), None)
            .map_err(connect)?;
        let advertised = connection
            .list()
            .map_err(connect)?
            .iter()
            .any(|head| head.name() == LOCAL_NOTES_REF);
        Ok(advertised)
    }

    fn drop_ref(&self, refname: &str) -> Result<(), StoreError> {
        match self.repo.find_reference(refname) {
            Ok(mut reference) => Ok(reference.delete()?),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl RemoteAccess for GitRepo {
    fn fetch_notes(
        &self,
        remote: &RemoteName,
        staging: &Namespace,
    ) -> Result<FetchOutcome, TransportError> {
        let has_notes = self.remote_has_notes(remote)?;

        // Forced: staging is a mirror, never merged into.
        let mut refspecs = vec![format!("+refs/heads/*:refs/remotes/{remote}/*")];
        if has_notes {
            refspecs.push(format!("+{LOCAL_NOTES_REF}:{staging}"));
        }

        let mut git_remote = self.find_remote(remote)?;
        let mut options = FetchOptions::new();
        options.remote_callbacks(remote_callbacks(&self.repo));
        git_remote
            .fetch(&refspecs, Some(&mut options), Some("tigs: fetch chats"))
            .map_err(|source| TransportError::Fetch {
                remote: remote.clone(),
                source,
            })?;

        if has_notes {
            debug!(%remote, staging = %staging, "remote notes staged");
            Ok(FetchOutcome::Staged)
        } else {
            self.drop_ref(staging.refname())?;
            debug!(%remote, "remote has no chats; staging cleared");
            Ok(FetchOutcome::NoRemoteNotes)
        }
    }

    fn push_notes(&self, remote: &RemoteName, local: &Namespace) -> Result<(), TransportError> {
        if self.ref_tip(local.refname())?.is_none() {
            return Ok(());
        }
        let mut git_remote = self.find_remote(remote)?;
        let refspec = format!("{0}:{0}", local.refname());

        let rejection: RefCell<Option<String>> = RefCell::new(None);
        {
            let mut callbacks = remote_callbacks(&self.repo);
            callbacks.push_update_reference(|_ref_name, status| {
                if let Some(msg) = status {
                    *rejection.borrow_mut() = Some(msg.to_string());
                }
                Ok(())
            });

            let mut options = PushOptions::new();
            options.remote_callbacks(callbacks);

            if let Err(e) = git_remote.push(&[refspec.as_str()], Some(&mut options)) {
                if e.code() == ErrorCode::NotFastForward || is_non_fast_forward(e.message()) {
                    return Err(TransportError::NonFastForward {
                        remote: remote.clone(),
                    });
                }
                return Err(TransportError::Push {
                    remote: remote.clone(),
                    source: e,
                });
            }
        }

        if let Some(message) = rejection.into_inner() {
            if is_non_fast_forward(&message) {
                return Err(TransportError::NonFastForward {
                    remote: remote.clone(),
                });
            }
            return Err(TransportError::Rejected {
                remote: remote.clone(),
                message,
            });
        }

        info!(%remote, refspec = %refspec, "chats pushed");
        Ok(())
    }

    fn is_reachable(&self, remote: &RemoteName, commit: &CommitId) -> Result<bool, StoreError> {
        let target = Oid::from_str(commit.as_str())?;
        if self.repo.find_commit(target).is_err() {
            return Ok(false);
        }

        let glob = format!("refs/remotes/{remote}/*");
        for reference in self.repo.references_glob(&glob)? {
            let Ok(tip) = reference?.peel_to_commit() else {
                continue;
            };
            if tip.id() == target || self.repo.graph_descendant_of(tip.id(), target)? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}
