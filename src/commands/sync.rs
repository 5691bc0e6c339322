use anyhow::Result;
use calmirror_core::SyncSession;
use calmirror_core::remote::{CalendarMutator, CalendarReader};

use crate::render::{MirrorRender, dimmed, red};
use crate::utils::tui;

/// Run one sync pass. Returns the number of failed creates and deletes.
pub async fn run<W, P>(session: SyncSession<W, P>, dry_run: bool, verbose: bool) -> Result<usize>
where
    W: CalendarReader,
    P: CalendarReader + CalendarMutator,
{
    let config = session.config();
    let header = format!(
        "📅 {} → {}",
        config.work_calendar_id, config.personal_calendar_id
    );
    let window = session.window();

    if dry_run {
        let spinner = tui::create_spinner(header.clone());
        let result = session.plan_with_window(window).await;
        spinner.finish_and_clear();
        let plan = result?;

        println!("{}", header);
        println!("{}", plan.diff.render(verbose));

        let (to_create, to_delete) = plan.diff.counts();
        println!(
            "\n{}",
            dimmed(&format!(
                "Dry run: would create {}, delete {} ({} to {})",
                to_create, to_delete, window.from, window.to
            ))
        );
        return Ok(0);
    }

    let spinner = tui::create_spinner(header.clone());
    let result = session.sync_with_window(window).await;
    spinner.finish_and_clear();
    let report = result?;

    println!("{}", header);
    println!("{}", report.reconcile.render(verbose));

    let created = report.reconcile.created.len();
    let deleted = report.reconcile.deleted.len();
    let failed = report.reconcile.failures.len();

    if created > 0 || deleted > 0 {
        println!("\nMirrored: {} created, {} deleted", created, deleted);
    }
    if failed > 0 {
        println!("{}", red(&format!("{} failed", failed)));
    }

    Ok(failed)
}
