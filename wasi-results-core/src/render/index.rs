use super::{
    document,
    Html,
    SITE_TITLE,
};
use crate::{
    model::{
        Entry,
        Report,
    },
    summary::summarize,
};

/// Index page: one summary card per report, in the given order
pub fn render_index(reports: &[(Entry, Report)]) -> String {
    let mut content = Html::new();
    content.raw("<h1>").text(SITE_TITLE).raw("</h1>\n");

    if reports.is_empty() {
        content.raw("<p>No results have been published yet.</p>\n");
        return document(SITE_TITLE, content);
    }

    content.raw("<div class=\"cards\">\n");
    for (entry, report) in reports {
        let summary = summarize(&report.results);
        content
            .raw("<section class=\"card\">\n<h2><a href=\"")
            .text(&entry.page_link())
            .raw("\">")
            .text(&report.runtime.name)
            .raw(" ")
            .text(&report.runtime.version)
            .raw("</a></h2>\n<p class=\"counts\">")
            .display(summary.passed)
            .raw("/")
            .display(summary.total)
            .raw(" passed</p>\n<progress value=\"")
            .display(summary.passed)
            .raw("\" max=\"")
            .display(summary.total)
            .raw("\">")
            .display(format_args!("{:.0}%", summary.pass_ratio() * 100.0))
            .raw("</progress>\n</section>\n");
    }
    content.raw("</div>\n");

    document(SITE_TITLE, content)
}
