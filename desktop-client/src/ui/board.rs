use common::games::tictactoe::{BOARD_SIDE, Board, Cell, Line};
use eframe::egui;

pub struct BoardView {
    last_hover: Option<usize>,
}

impl BoardView {
    const MIN_CELL_SIZE: f32 = 60.0;
    const MAX_CELL_SIZE: f32 = 140.0;
    const LINE_WIDTH: f32 = 2.0;

    pub fn new() -> Self {
        Self { last_hover: None }
    }

    fn calculate_cell_size(available_width: f32, available_height: f32) -> f32 {
        let cell_size = available_width.min(available_height) / BOARD_SIDE as f32;
        cell_size.clamp(Self::MIN_CELL_SIZE, Self::MAX_CELL_SIZE)
    }

    fn cell_rect(rect: egui::Rect, cell_size: f32, index: usize) -> egui::Rect {
        let x = (index % BOARD_SIDE) as f32;
        let y = (index / BOARD_SIDE) as f32;
        egui::Rect::from_min_size(
            egui::pos2(rect.left() + x * cell_size, rect.top() + y * cell_size),
            egui::vec2(cell_size, cell_size),
        )
    }

    /// Draws the board and returns the clicked cell, if any. The last move gets
    /// an outline. Hover and clicks
    /// are only tracked while `interactive` is set.
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        board: &Board,
        winning_line: Option<Line>,
        last_move: Option<usize>,
        interactive: bool,
    ) -> Option<usize> {
        let cell_size = Self::calculate_cell_size(ui.available_width(), ui.available_height());
        let side = cell_size * BOARD_SIDE as f32;

        let sense = if interactive { egui::Sense::click() } else { egui::Sense::hover() };
        let (rect, response) = ui.allocate_exact_size(egui::vec2(side, side), sense);

        let painter = ui.painter();
        painter.rect_filled(rect, 0.0, egui::Color32::from_rgb(240, 240, 240));

        for i in 0..=BOARD_SIDE {
            let offset = i as f32 * cell_size;
            let stroke = egui::Stroke::new(Self::LINE_WIDTH, egui::Color32::BLACK);
            painter.line_segment(
                [egui::pos2(rect.left() + offset, rect.top()), egui::pos2(rect.left() + offset, rect.bottom())],
                stroke,
            );
            painter.line_segment(
                [egui::pos2(rect.left(), rect.top() + offset), egui::pos2(rect.right(), rect.top() + offset)],
                stroke,
            );
        }

        for (index, cell) in board.cells().iter().enumerate() {
            let cell_rect = Self::cell_rect(rect, cell_size, index);
            match cell {
                Cell::X => self.draw_x(painter, cell_rect),
                Cell::O => self.draw_o(painter, cell_rect),
                Cell::Empty => {}
            }
        }

        if let Some(index) = last_move {
            painter.rect_stroke(
                Self::cell_rect(rect, cell_size, index).shrink(3.0),
                0.0,
                egui::Stroke::new(2.0, egui::Color32::from_rgb(200, 170, 60)),
                egui::StrokeKind::Inside,
            );
        }

        if let Some([start, _, end]) = winning_line {
            let start_pos = Self::cell_rect(rect, cell_size, start).center();
            let end_pos = Self::cell_rect(rect, cell_size, end).center();
            painter.line_segment(
                [start_pos, end_pos],
                egui::Stroke::new(6.0, egui::Color32::from_rgba_unmultiplied(50, 200, 50, 200)),
            );
        }

        self.last_hover = None;
        if !interactive {
            return None;
        }

        if let Some(hover_pos) = response.hover_pos() {
            let x = ((hover_pos.x - rect.left()) / cell_size) as usize;
            let y = ((hover_pos.y - rect.top()) / cell_size) as usize;
            let index = y * BOARD_SIDE + x;

            if x < BOARD_SIDE && y < BOARD_SIDE && board.get(index).is_some_and(|cell| cell.is_empty()) {
                painter.rect_filled(
                    Self::cell_rect(rect, cell_size, index),
                    0.0,
                    egui::Color32::from_rgba_unmultiplied(100, 150, 255, 50),
                );
                self.last_hover = Some(index);
            }
        }

        if response.clicked() {
            return self.last_hover;
        }
        None
    }

    fn draw_x(&self, painter: &egui::Painter, rect: egui::Rect) {
        let padding = rect.width() * 0.2;
        let stroke = egui::Stroke::new(4.0, egui::Color32::from_rgb(220, 50, 50));

        painter.line_segment(
            [
                egui::pos2(rect.left() + padding, rect.top() + padding),
                egui::pos2(rect.right() - padding, rect.bottom() - padding),
            ],
            stroke,
        );
        painter.line_segment(
            [
                egui::pos2(rect.right() - padding, rect.top() + padding),
                egui::pos2(rect.left() + padding, rect.bottom() - padding),
            ],
            stroke,
        );
    }

    fn draw_o(&self, painter: &egui::Painter, rect: egui::Rect) {
        let padding = rect.width() * 0.2;
        let radius = (rect.width() / 2.0) - padding;
        let stroke = egui::Stroke::new(4.0, egui::Color32::from_rgb(50, 50, 220));

        painter.circle_stroke(rect.center(), radius, stroke);
    }
}
