use super::{
    document,
    Html,
};
use crate::{
    model::{
        Report,
        TestResult,
    },
    summary::{
        sort_by_path,
        summarize,
    },
};

/// Everything the detail page shows for one report
#[derive(Debug, Clone, Copy)]
pub struct DetailPage<'a> {
    pub runtime:    &'a str,
    pub version:    &'a str,
    /// Commit the report was produced from, when known
    pub commit:     Option<&'a str>,
    /// Link to that commit upstream
    pub commit_url: Option<&'a str>,
    pub results:    &'a [TestResult],
}

impl<'a> DetailPage<'a> {
    pub fn new(report: &'a Report) -> Self {
        Self {
            runtime:    &report.runtime.name,
            version:    &report.runtime.version,
            commit:     None,
            commit_url: None,
            results:    &report.results,
        }
    }

    pub fn with_commit(mut self, commit: Option<&'a str>, commit_url: Option<&'a str>) -> Self {
        self.commit = commit;
        self.commit_url = commit_url;
        self
    }
}

/// Detail page: header, overall counts, and one row per test sorted by path
pub fn render_detail(page: &DetailPage<'_>) -> String {
    let summary = summarize(page.results);
    let title = format!("{} {}", page.runtime, page.version);

    let mut content = Html::new();
    content
        .raw("<h1>")
        .text(page.runtime)
        .raw(" <small>")
        .text(page.version)
        .raw("</small></h1>\n");

    if let Some(commit) = page.commit {
        content.raw("<p class=\"commit\">Testsuite commit ");
        match page.commit_url {
            Some(url) => {
                content
                    .raw("<a href=\"")
                    .text(url)
                    .raw("\"><code>")
                    .text(commit)
                    .raw("</code></a>");
            },
            None => {
                content.raw("<code>").text(commit).raw("</code>");
            },
        }
        content.raw("</p>\n");
    }

    content
        .raw("<p class=\"summary\">")
        .display(summary.passed)
        .raw("/")
        .display(summary.total)
        .raw(" passed</p>\n");

    content.raw("<table>\n<thead><tr><th>Test</th><th>Status</th></tr></thead>\n<tbody>\n");
    for result in sort_by_path(page.results) {
        render_row(&mut content, &result);
    }
    content.raw("</tbody>\n</table>\n");

    document(&title, content)
}

fn render_row(content: &mut Html, result: &TestResult) {
    content
        .raw("<tr><td class=\"path\">")
        .text(&result.path)
        .raw("</td><td class=\"")
        .text(&result.status.css_class())
        .raw("\">");
    if result.message.is_empty() {
        content.text(result.status.as_str());
    } else {
        content
            .raw("<details><summary>")
            .text(result.status.as_str())
            .raw("</summary><pre>")
            .text(&result.message)
            .raw("</pre></details>");
    }
    content.raw("</td></tr>\n");
}
