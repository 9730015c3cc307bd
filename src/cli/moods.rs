use tabled::Table;

use crate::{mood::Mood, types::MoodTableRow};

pub async fn moods() {
    let rows: Vec<MoodTableRow> = Mood::ALL.into_iter().map(MoodTableRow::from).collect();
    let table = Table::new(rows);
    println!("{table}");
}
