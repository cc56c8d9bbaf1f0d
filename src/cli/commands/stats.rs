use tracing::debug;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::errors::StatsError;
use crate::stats::{StatisticsView, StatsScope};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "stats",
            "Chart the month, the selected category, or the year",
            "stats [month|category|year]",
            cmd_stats,
        ),
        CommandEntry::new(
            "widen",
            "Switch the open charts to the wider scope",
            "widen",
            cmd_widen,
        ),
        CommandEntry::new(
            "redraw",
            "Redraw the open charts, optionally at a given width",
            "redraw [width]",
            cmd_redraw,
        ),
    ]
}

fn parse_scope(context: &ShellContext, arg: Option<&&str>) -> Result<StatsScope, CommandError> {
    let month = context.book.current();
    match arg.map(|raw| raw.to_ascii_lowercase()).as_deref() {
        None | Some("month") => Ok(StatsScope::Month(month)),
        Some("category") => Ok(StatsScope::Category {
            month,
            position: context.selected_position()?,
        }),
        Some("year") => Ok(StatsScope::Year),
        Some(other) => Err(CommandError::InvalidArguments(format!(
            "Unknown statistics scope `{other}`. Use month, category or year."
        ))),
    }
}

/// Opens a view, dropping whatever was open when there is nothing to plot.
fn open_view(context: &mut ShellContext, scope: StatsScope) -> CommandResult {
    match StatisticsView::open(&context.book, scope) {
        Ok(view) => {
            context.stats = Some(view);
            context.mark_stats_fresh();
            Ok(())
        }
        Err(err @ StatsError::EmptyDataset) => {
            context.stats = None;
            Err(err.into())
        }
        Err(err) => Err(err.into()),
    }
}

fn show(context: &mut ShellContext, width: Option<usize>) -> CommandResult {
    let rows = match &context.stats {
        Some(view) => view.totals().iter().map(|totals| totals.len()).max().unwrap_or(0),
        None => {
            return Err(CommandError::InvalidArguments(
                "No statistics open; run `stats` first.".into(),
            ))
        }
    };
    let size = context.chart_size(width, rows);
    let ShellContext {
        stats,
        renderer,
        localizer,
        ..
    } = context;
    let Some(view) = stats.as_mut() else {
        return Ok(());
    };
    for chart in view.render(&*renderer, size, &*localizer) {
        output::block(chart);
    }
    if !view.is_widened() {
        if let Some(label) = view.scope().widen_label() {
            output::hint(format!("{} (`widen`)", localizer.tr(label)));
        }
    }
    Ok(())
}

fn cmd_stats(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let scope = parse_scope(context, args.first())?;
    open_view(context, scope)?;
    show(context, None)
}

fn cmd_widen(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let Some(view) = context.stats.as_mut() else {
        return Err(CommandError::InvalidArguments(
            "No statistics open; run `stats` first.".into(),
        ));
    };
    if !view.widen(&context.book)? {
        io::print_info("Statistics already show the widest scope.");
        return Ok(());
    }
    show(context, None)
}

fn cmd_redraw(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let width = match args.first() {
        Some(raw) => Some(raw.parse::<usize>().map_err(|_| {
            CommandError::InvalidArguments(format!("Invalid width `{raw}`."))
        })?),
        None => None,
    };
    if context.take_stats_stale() {
        if let Some(view) = context.stats.as_mut() {
            debug!(scope = ?view.scope(), "ledger changed, refreshing statistics");
            match view.refresh(&context.book) {
                Ok(()) => {}
                Err(err @ StatsError::EmptyDataset) => {
                    context.stats = None;
                    return Err(err.into());
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
    show(context, width)
}
