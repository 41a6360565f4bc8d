use messenger_text::to_ansi;

/// Something that can be sent messages, such as a player or the console.
pub trait MessageSink {
    fn send_message(&mut self, message: &str);

    /// Sends each line as its own message.
    fn send_messages(&mut self, messages: &[String]) {
        for message in messages {
            self.send_message(message);
        }
    }
}

impl MessageSink for Vec<String> {
    fn send_message(&mut self, message: &str) {
        self.push(message.to_string());
    }
}

impl<S: MessageSink + ?Sized> MessageSink for &mut S {
    fn send_message(&mut self, message: &str) {
        (**self).send_message(message);
    }

    fn send_messages(&mut self, messages: &[String]) {
        (**self).send_messages(messages);
    }
}

/// Prints messages to stdout, turning color codes into terminal colors.
/// Colors are stripped when stdout is not a terminal.
#[derive(Default)]
pub struct ConsoleSink;

impl MessageSink for ConsoleSink {
    fn send_message(&mut self, message: &str) {
        anstream::println!("{}", to_ansi(message));
    }
}
