mod app;
mod effects;
mod form;
mod store;
mod ui;

fn main() {
    app::run();
}
