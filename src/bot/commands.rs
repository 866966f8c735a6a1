/// Inbound chat commands. Every command carries the shared secret presented by
/// the sender; the gate itself lives in the bot loop so all commands are
/// rejected uniformly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/low <secret>` — on-demand low-stock report.
    LowStockReport { secret: String },
    /// `/restock <secret> <item_id> <amount>` — additive restock.
    Restock {
        secret: String,
        item_id: i32,
        amount: i32,
    },
    /// `/setchat <secret>` — register the sender's chat as the alert target.
    RegisterChat { secret: String },
    /// `/notification <secret>` — register and force a fresh alert cycle.
    EnableNotifications { secret: String },
}

impl Command {
    pub fn secret(&self) -> &str {
        match self {
            Command::LowStockReport { secret }
            | Command::Restock { secret, .. }
            | Command::RegisterChat { secret }
            | Command::EnableNotifications { secret } => secret,
        }
    }
}

fn parse_positive(token: &str) -> Option<i32> {
    token.parse::<i32>().ok().filter(|value| *value > 0)
}

/// Parses a message into a command. Anything unrecognized or malformed yields
/// `None` and is silently ignored, like unmatched patterns at a chat gateway.
pub fn parse(text: &str) -> Option<Command> {
    let mut parts = text.split_whitespace();
    match parts.next()? {
        "/low" => Some(Command::LowStockReport {
            secret: parts.next()?.to_owned(),
        }),
        "/restock" => {
            let secret = parts.next()?.to_owned();
            let item_id = parse_positive(parts.next()?)?;
            let amount = parse_positive(parts.next()?)?;
            Some(Command::Restock {
                secret,
                item_id,
                amount,
            })
        }
        "/setchat" => Some(Command::RegisterChat {
            secret: parts.next()?.to_owned(),
        }),
        "/notification" => Some(Command::EnableNotifications {
            secret: parts.next()?.to_owned(),
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_low_report() {
        assert_eq!(
            parse("/low s3cret"),
            Some(Command::LowStockReport {
                secret: "s3cret".to_string()
            })
        );
        assert_eq!(parse("/low"), None);
    }

    #[test]
    fn test_parse_restock() {
        assert_eq!(
            parse("/restock s3cret 12 40"),
            Some(Command::Restock {
                secret: "s3cret".to_string(),
                item_id: 12,
                amount: 40,
            })
        );
        // Malformed or non-positive numbers are ignored, not errors.
        assert_eq!(parse("/restock s3cret twelve 40"), None);
        assert_eq!(parse("/restock s3cret 12"), None);
        assert_eq!(parse("/restock s3cret 12 -5"), None);
        assert_eq!(parse("/restock s3cret 0 5"), None);
    }

    #[test]
    fn test_parse_registration_commands() {
        assert_eq!(
            parse("/setchat s3cret"),
            Some(Command::RegisterChat {
                secret: "s3cret".to_string()
            })
        );
        assert_eq!(
            parse("/notification s3cret"),
            Some(Command::EnableNotifications {
                secret: "s3cret".to_string()
            })
        );
    }

    #[test]
    fn test_parse_ignores_chatter() {
        assert_eq!(parse("hello there"), None);
        assert_eq!(parse("/unknown s3cret"), None);
        assert_eq!(parse(""), None);
    }
}
