use super::super::render::{self, FetchView, PullView, PushView};
use super::super::{Ctx, PullArgs, RemoteArgs, print_json, print_line};
use crate::Result;
use crate::chats;

pub(crate) fn fetch(ctx: &Ctx, args: RemoteArgs) -> Result<()> {
    let remote = ctx.remote(args.remote);
    let report = chats::fetch(&ctx.repo, &remote)?;
    if ctx.json {
        return print_json(&FetchView::from(&report));
    }
    print_line(&render::render_fetch(&report))
}

/// Prints the report even when conflicts remain, then fails with them.
pub(crate) fn pull(ctx: &Ctx, args: PullArgs) -> Result<()> {
    let remote = ctx.remote(args.remote);
    let strategy = args.strategy.unwrap_or(ctx.config.strategy);
    let report = chats::pull(&ctx.repo, &remote, strategy)?;
    if ctx.json {
        print_json(&PullView::new(&report.fetch, &report.merge))?;
    } else {
        print_line(&render::render_merge(&report.merge))?;
    }
    report.merge.into_result()?;
    Ok(())
}

pub(crate) fn push(ctx: &Ctx, args: RemoteArgs) -> Result<()> {
    let remote = ctx.remote(args.remote);
    let report = chats::push(&ctx.repo, &remote)?;
    if ctx.json {
        return print_json(&PushView::from(&report));
    }
    print_line(&render::render_push(&report))
}
