use crate::error::SearchError;
use crate::model::Article;
use crate::opener::ExternalOpener;
use crate::search::{OverlapPolicy, SearchController, SearchTicket};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Input,
    List,
}

#[derive(Debug)]
pub struct App {
    pub search: SearchController,
    pub selected: usize, // index into search.results()
    pub focus: Focus,
    pub status: String,
}

impl App {
    pub fn new(policy: OverlapPolicy) -> Self {
        Self {
            search: SearchController::new(policy),
            selected: 0,
            focus: Focus::Input,
            status: "Type a search term and press Enter. Tab switches to results.".to_string(),
        }
    }

    pub fn begin_search(&mut self) -> Option<SearchTicket> {
        let ticket = self.search.begin()?;
        self.status = format!("Searching for \"{}\"…", ticket.query());
        Some(ticket)
    }

    pub fn apply(&mut self, ticket: &SearchTicket, outcome: Result<Vec<Article>, SearchError>) {
        let succeeded = outcome.is_ok();
        if !self.search.settle(ticket, outcome) {
            return;
        }

        if succeeded {
            self.selected = 0;
            self.status = format!(
                "{} articles for \"{}\"",
                self.search.results().len(),
                ticket.query()
            );
        } else {
            self.clamp_selection();
            self.status = format!("Search for \"{}\" failed", ticket.query());
        }
    }

    pub fn selected_article(&self) -> Option<&Article> {
        self.search.results().get(self.selected)
    }

    pub fn move_down(&mut self) {
        let len = self.search.results().len();
        if len == 0 { return; }
        self.selected = (self.selected + 1).min(len - 1);
    }

    pub fn move_up(&mut self) {
        if self.search.results().is_empty() { return; }
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Input => Focus::List,
            Focus::List => Focus::Input,
        };
    }

    pub fn open_selected(&mut self, opener: &dyn ExternalOpener) {
        let Some(link) = self.selected_article().and_then(|a| a.link()).map(str::to_string) else {
            self.status = "Nothing to open.".to_string();
            return;
        };
        self.hand_off(opener, &link, "Opened in browser.");
    }

    pub fn open_selected_image(&mut self, opener: &dyn ExternalOpener) {
        let Some(link) = self
            .selected_article()
            .and_then(|a| a.image_link())
            .map(str::to_string)
        else {
            self.status = "This article has no image.".to_string();
            return;
        };
        self.hand_off(opener, &link, "Opened image.");
    }

    fn hand_off(&mut self, opener: &dyn ExternalOpener, link: &str, done: &str) {
        self.status = match opener.open(link) {
            Ok(()) => done.to_string(),
            Err(e) => {
                tracing::warn!(error = %e, "could not hand off link");
                format!("Could not open browser: {}", e)
            }
        };
    }

    fn clamp_selection(&mut self) {
        let len = self.search.results().len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use std::cell::RefCell;
    use std::io;

    #[derive(Default)]
    struct RecordingOpener {
        opened: RefCell<Vec<String>>,
    }

    impl ExternalOpener for RecordingOpener {
        fn open(&self, url: &str) -> io::Result<()> {
            self.opened.borrow_mut().push(url.to_string());
            Ok(())
        }
    }

    struct BrokenOpener;

    impl ExternalOpener for BrokenOpener {
        fn open(&self, _url: &str) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::NotFound, "no handler"))
        }
    }

    fn article(title: &str, image: Option<&str>) -> Article {
        Article {
            title: Some(title.to_string()),
            url: Some(format!("http://example.com/{title}")),
            url_to_image: image.map(str::to_string),
            ..Default::default()
        }
    }

    fn loaded(articles: Vec<Article>) -> App {
        let mut app = App::new(OverlapPolicy::LastResolved);
        app.search.set_query("news");
        let ticket = app.begin_search().unwrap();
        app.apply(&ticket, Ok(articles));
        app
    }

    #[test]
    fn blank_query_does_not_start_a_search() {
        let mut app = App::new(OverlapPolicy::LastResolved);
        let status = app.status.clone();
        assert!(app.begin_search().is_none());
        assert_eq!(app.status, status);
        assert!(!app.search.is_loading());
    }

    #[test]
    fn selection_moves_within_bounds() {
        let mut app = loaded(vec![article("a", None), article("b", None)]);
        app.move_up();
        assert_eq!(app.selected, 0);
        app.move_down();
        app.move_down();
        assert_eq!(app.selected, 1);
        assert_eq!(app.selected_article().unwrap().title_line(), "b");
    }

    #[test]
    fn new_results_reset_selection() {
        let mut app = loaded(vec![article("a", None), article("b", None)]);
        app.move_down();

        let ticket = app.begin_search().unwrap();
        app.apply(&ticket, Ok(vec![article("c", None)]));

        assert_eq!(app.selected, 0);
        assert_eq!(app.status, "1 articles for \"news\"");
    }

    #[test]
    fn failure_keeps_selection_on_stale_results() {
        let mut app = loaded(vec![article("a", None), article("b", None)]);
        app.move_down();

        let ticket = app.begin_search().unwrap();
        app.apply(&ticket, Err(SearchError::Status(StatusCode::INTERNAL_SERVER_ERROR)));

        assert_eq!(app.selected, 1);
        assert_eq!(app.search.error(), crate::search::SEARCH_FAILED);
        assert_eq!(app.search.results().len(), 2);
    }

    #[test]
    fn opens_selected_article_link() {
        let mut app = loaded(vec![article("a", None), article("b", Some("http://img/b.png"))]);
        app.move_down();
        let opener = RecordingOpener::default();

        app.open_selected(&opener);
        app.open_selected_image(&opener);

        assert_eq!(
            *opener.opened.borrow(),
            ["http://example.com/b", "http://img/b.png"]
        );
        assert_eq!(app.status, "Opened image.");
    }

    #[test]
    fn missing_image_is_reported() {
        let mut app = loaded(vec![article("a", None)]);
        let opener = RecordingOpener::default();
        app.open_selected_image(&opener);
        assert!(opener.opened.borrow().is_empty());
        assert_eq!(app.status, "This article has no image.");
    }

    #[test]
    fn nothing_selected_opens_nothing() {
        let mut app = App::new(OverlapPolicy::LastResolved);
        let opener = RecordingOpener::default();
        app.open_selected(&opener);
        assert!(opener.opened.borrow().is_empty());
    }

    #[test]
    fn failed_hand_off_only_updates_status() {
        let mut app = loaded(vec![article("a", None)]);
        app.open_selected(&BrokenOpener);
        assert!(app.status.starts_with("Could not open browser"));
        assert_eq!(app.search.results().len(), 1);
    }

    #[test]
    fn tab_toggles_focus() {
        let mut app = App::new(OverlapPolicy::LastResolved);
        assert_eq!(app.focus, Focus::Input);
        app.toggle_focus();
        assert_eq!(app.focus, Focus::List);
        app.toggle_focus();
        assert_eq!(app.focus, Focus::Input);
    }
}
