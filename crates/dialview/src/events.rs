use crate::config::CellLabel;

#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    ScrollTo(usize),
    AddCell(CellLabel),
    Spin(f64),
    ConfigReload,
}
