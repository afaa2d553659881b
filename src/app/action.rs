#[derive(Debug)]
pub enum Action {
    SendMessage { target: String, text: String },
    JoinChannel { channel: String },
    PartChannel { channel: String },
    RefreshAll { manual: bool },
    RefreshChannel { login: String },
    Quit { message: Option<String> },
}
