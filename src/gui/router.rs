// src/gui/router.rs
use crate::config::state::View;
use super::pages::{self, Page};

pub static PAGES: &[&'static dyn Page] = &[
    &pages::entry::PAGE,
    &pages::list::PAGE,
    &pages::dashboard::PAGE,
    &pages::setup::PAGE,
];

pub fn all_pages() -> &'static [&'static dyn Page] {
    PAGES
}

pub fn page_for(view: View) -> &'static dyn Page {
    match view {
        View::Entry     => &pages::entry::PAGE,
        View::List      => &pages::list::PAGE,
        View::Dashboard => &pages::dashboard::PAGE,
        View::Setup     => &pages::setup::PAGE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_view_has_its_page_in_tab_order() {
        let order: Vec<View> = all_pages().iter().map(|p| p.view()).collect();
        assert_eq!(order, View::ALL);
        for v in View::ALL {
            assert_eq!(page_for(v).view(), v);
        }
    }
}
