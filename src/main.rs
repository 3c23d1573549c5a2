use tableau::TableauApp;

fn main() -> anyhow::Result<()> {
    let app = TableauApp::new();
    app.run()
}
