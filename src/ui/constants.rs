use ratatui::layout::Margin;

pub(crate) const FORM_TITLE: &str = "SCP transfer";
pub(crate) const SUBMIT_LABEL: &str = "Submit";
pub(crate) const SUGGESTION_PREFIX: &str = "↪ ";

pub(crate) const LABEL_WIDTH: usize = 9;
pub(crate) const INPUT_WIDTH: u16 = 30;
pub(crate) const INDICATOR_WIDTH: u16 = 2;

pub(crate) const FORM_MIN_WIDTH: u16 = 50;
pub(crate) const FORM_WIDTH_PERCENT: u16 = 70;

pub(crate) const POPUP_MIN_WIDTH: u16 = 10;
pub(crate) const POPUP_MIN_HEIGHT: u16 = 5;
pub(crate) const POPUP_PADDING: Margin = Margin::new(2, 1);
