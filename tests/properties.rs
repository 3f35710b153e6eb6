use gridentry::application::{
    EditState, GridConfig, GridController, InputEvent, Intent, Key, KeyInput,
};
use gridentry::domain::{to_reference, Address, Cell, CellValue, Grid};
use std::cell::RefCell;
use std::rc::Rc;

fn key(key: Key) -> InputEvent {
    InputEvent::Key(KeyInput::plain(key))
}

fn controller(rows: usize, cols: usize) -> GridController {
    let mut app = GridController::new(GridConfig::default().with_dimensions(rows, cols)).unwrap();
    app.focus();
    app
}

fn commit_text(app: &mut GridController, text: &str) -> Cell {
    let addr = app.selected_address().unwrap();
    app.begin_edit_with(text);
    app.commit_edit(None);
    app.grid().cell(addr.row, addr.col).unwrap().clone()
}

#[test]
fn reference_codec_values() {
    assert_eq!(to_reference(0, 0), "A1");
    assert_eq!(to_reference(0, 25), "Z1");
    assert_eq!(to_reference(0, 26), "AA1");
    assert_eq!(to_reference(5, 0), "A6");
    assert_eq!(to_reference(0, 701), "ZZ1");
    assert_eq!(to_reference(0, 702), "AAA1");
}

#[test]
fn navigation_never_leaves_the_grid() {
    let mut app = controller(4, 3);
    let keys = [Key::Up, Key::Left, Key::Down, Key::Down, Key::Down, Key::Down, Key::Down,
        Key::Right, Key::Right, Key::Right, Key::Right, Key::Up];

    for k in keys {
        app.handle_event(key(k));
        let addr = app.selected_address().unwrap();
        assert!(addr.row < 4 && addr.col < 3, "{addr:?} after {k:?}");
    }
    assert_eq!(app.selected_address(), Some(Address::new(2, 2)));
}

#[test]
fn move_up_at_top_and_right_at_edge_hold() {
    let mut app = controller(2, 2);
    assert_eq!(app.handle_event(key(Key::Up)), Intent::Navigate(Address::new(0, 0)));
    app.handle_event(key(Key::Right));
    assert_eq!(app.handle_event(key(Key::Right)), Intent::Navigate(Address::new(0, 1)));
}

#[test]
fn read_only_cell_never_enters_editing() {
    let config = GridConfig::default()
        .with_initial_grid(vec![vec![Cell::read_only("fixed"), Cell::new("")]]);
    let mut app = GridController::new(config).unwrap();
    let target = Address::new(0, 0);

    let triggers = [
        InputEvent::Click(target),
        key(Key::Enter),
        key(Key::F(2)),
        key(Key::Char('x')),
        InputEvent::DoubleClick(target),
        key(Key::Delete),
        key(Key::Backspace),
    ];
    for event in triggers {
        app.handle_event(event);
        assert_ne!(app.editing_address(), Some(target));
    }
    assert_eq!(app.grid().cell(0, 0).unwrap().value, CellValue::Text("fixed".to_string()));

    let cleared = app.grid().clear_cell(0, 0);
    assert_eq!(cleared.cell(0, 0).unwrap().value, CellValue::Text("fixed".to_string()));
}

#[test]
fn global_read_only_refuses_writable_cells() {
    let mut app = GridController::new(GridConfig::default().with_read_only(true)).unwrap();
    app.focus();
    assert_eq!(app.handle_event(key(Key::Char('1'))), Intent::Refused);
    assert_eq!(app.handle_event(InputEvent::DoubleClick(Address::new(1, 1))), Intent::Refused);
    assert_eq!(app.state(), &EditState::Selected(Address::new(1, 1)));
}

#[test]
fn commit_parsing() {
    let mut app = controller(1, 1);

    let number = commit_text(&mut app, "42");
    assert_eq!(number.value, CellValue::Number(42.0));
    assert!(number.formula.is_none());

    let text = commit_text(&mut app, "42a");
    assert_eq!(text.value, CellValue::Text("42a".to_string()));

    let formula = commit_text(&mut app, "=A1+B1");
    assert_eq!(formula.formula.as_deref(), Some("=A1+B1"));
    assert_eq!(formula.value, CellValue::Text("=A1+B1".to_string()));

    let empty = commit_text(&mut app, "");
    assert_eq!(empty.value, CellValue::Text(String::new()));
    assert!(empty.formula.is_none());
}

#[test]
fn at_most_one_cell_is_edited() {
    let mut app = controller(3, 3);
    let script = [
        key(Key::Char('a')),
        InputEvent::Click(Address::new(2, 2)),
        InputEvent::DoubleClick(Address::new(1, 1)),
        key(Key::Char('b')),
        InputEvent::DoubleClick(Address::new(0, 2)),
        key(Key::Tab),
        key(Key::Enter),
        key(Key::Escape),
    ];

    for event in script {
        app.handle_event(event);
        if let Some(editing) = app.editing_address() {
            assert_eq!(app.selected_address(), Some(editing));
        }
    }

    assert_eq!(app.grid().cell(0, 0).unwrap().raw_content(), "a");
    assert_eq!(app.grid().cell(1, 1).unwrap().raw_content(), "b");
}

#[test]
fn escape_discards_buffer() {
    let config = GridConfig::default().with_initial_grid(vec![vec![Cell::new("X")]]);
    let mut app = GridController::new(config).unwrap();
    app.focus();

    app.handle_event(key(Key::Enter));
    app.handle_event(key(Key::Backspace));
    app.handle_event(key(Key::Char('Y')));
    assert_eq!(app.buffer().unwrap().as_str(), "Y");

    app.handle_event(key(Key::Escape));
    assert_eq!(app.grid().cell(0, 0).unwrap().value, CellValue::Text("X".to_string()));
    assert_eq!(app.state(), &EditState::Selected(Address::new(0, 0)));
}

#[test]
fn tab_wraps_to_next_row_and_holds_at_last_cell() {
    let mut app = controller(2, 3);
    app.select(0, 2);
    app.handle_event(key(Key::Char('1')));
    assert_eq!(
        app.handle_event(key(Key::Tab)),
        Intent::Commit { from: Address::new(0, 2), to: Address::new(1, 0) }
    );

    app.select(1, 2);
    app.handle_event(key(Key::Char('2')));
    assert_eq!(
        app.handle_event(key(Key::Tab)),
        Intent::Commit { from: Address::new(1, 2), to: Address::new(1, 2) }
    );
}

#[test]
fn enter_advances_down_and_holds_at_last_row() {
    let mut app = controller(2, 1);
    app.handle_event(key(Key::Char('1')));
    app.handle_event(key(Key::Enter));
    assert_eq!(app.selected_address(), Some(Address::new(1, 0)));
    app.handle_event(key(Key::Char('2')));
    app.handle_event(key(Key::Enter));
    assert_eq!(app.selected_address(), Some(Address::new(1, 0)));
}

#[test]
fn on_change_payload_round_trips_through_json() {
    let payloads = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&payloads);
    let mut app = controller(2, 2).with_on_change(move |grid: &Grid| {
        sink.borrow_mut().push(serde_json::to_string(grid).unwrap());
    });

    app.handle_event(key(Key::Char('=')));
    app.handle_event(key(Key::Char('B')));
    app.handle_event(key(Key::Char('2')));
    app.handle_event(key(Key::Tab));
    app.handle_event(key(Key::Char('7')));
    app.handle_event(key(Key::Enter));

    let payloads = payloads.borrow();
    assert_eq!(payloads.len(), 2);
    let restored: Grid = serde_json::from_str(payloads.last().unwrap()).unwrap();
    assert_eq!(&restored, app.grid());
    assert_eq!(restored.cell(0, 0).unwrap().formula.as_deref(), Some("=B2"));
    assert_eq!(restored.cell(0, 1).unwrap().value, CellValue::Number(7.0));
}

#[test]
fn date_like_text_survives_the_payload() {
    let payloads = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&payloads);
    let mut app = controller(1, 1).with_on_change(move |grid: &Grid| {
        sink.borrow_mut().push(serde_json::to_string(grid).unwrap());
    });

    app.begin_edit_with("2024-03-01T12:30:00+02:00");
    app.commit_edit(None);

    let payloads = payloads.borrow();
    let restored: Grid = serde_json::from_str(&payloads[0]).unwrap();
    assert_eq!(&restored, app.grid());
    assert_eq!(
        restored.cell(0, 0).unwrap().value,
        CellValue::Text("2024-03-01T12:30:00+02:00".to_string())
    );
}
