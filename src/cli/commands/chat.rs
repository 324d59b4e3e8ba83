use super::super::render::{self, CommitView, ShowView};
use super::super::{AddChatArgs, CommitArgs, Ctx, print_json, print_line, print_raw};
use crate::Result;
use crate::chats;

pub(crate) fn add(ctx: &Ctx, args: AddChatArgs) -> Result<()> {
    let commit = chats::add_chat(&ctx.repo, &args.commit, &args.message)?;
    if ctx.json {
        return print_json(&CommitView {
            commit: commit.as_str(),
        });
    }
    print_line(&render::render_added(&commit))
}

pub(crate) fn show(ctx: &Ctx, args: CommitArgs) -> Result<()> {
    if ctx.json {
        let commit = chats::resolve(&ctx.repo, &args.commit)?;
        let docs = chats::show_documents(&ctx.repo, commit.as_str())?;
        return print_json(&ShowView {
            commit: commit.as_str(),
            chats: &docs,
        });
    }
    // Verbatim: the note text is the canonical form.
    let blob = chats::show_chat(&ctx.repo, &args.commit)?;
    print_raw(blob.as_str())
}

pub(crate) fn list(ctx: &Ctx) -> Result<()> {
    let commits = chats::list_chats(&ctx.repo)?;
    if ctx.json {
        let ids: Vec<&str> = commits.iter().map(|c| c.as_str()).collect();
        return print_json(&ids);
    }
    for commit in &commits {
        print_line(commit.as_str())?;
    }
    Ok(())
}

pub(crate) fn remove(ctx: &Ctx, args: CommitArgs) -> Result<()> {
    let commit = chats::remove_chat(&ctx.repo, &args.commit)?;
    if ctx.json {
        return print_json(&CommitView {
            commit: commit.as_str(),
        });
    }
    print_line(&render::render_removed(&commit))
}
