//! Render a response message for the terminal.
use recursor::rfc::message::Message;

pub fn display_response(message: &Message, minimal: bool) {
    println!(";; {}", message.header);
    for question in &message.questions {
        println!(";; question: {}", question);
    }

    if message.answers.is_empty() {
        println!(";; no answer records");
    }
    for rr in &message.answers {
        println!("{}", rr);
    }

    if minimal {
        return;
    }

    if !message.authorities.is_empty() {
        println!(";; authority:");
        for rr in &message.authorities {
            println!("{}", rr);
        }
    }
    if !message.additionals.is_empty() {
        println!(";; additional:");
        for rr in &message.additionals {
            println!("{}", rr);
        }
    }
}
