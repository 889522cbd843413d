//! Command-line argument parsing for the Mirage CLI.

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Print the home feed
    Feed,
    /// Print one post
    Post(String),
    /// Search posts (`#tag`) or profiles
    Search(String),
    /// Print a profile and its posts
    Profile(String),
    /// Print the signed-in account
    Whoami,
    Login { email: String, password: String },
    Register {
        email: String,
        username: String,
        display_name: String,
        password: String,
    },
    Logout,
    /// Publish a text post
    Publish(String),
    Like(String),
    Retweet(String),
    Delete(String),
    Follow(String),
    /// Arguments that do not form a command, with the reason
    Invalid(String),
}

/// Usage text printed by `help` and after invalid arguments.
pub const USAGE: &str = "\
usage: mirage <command> [args]

commands:
  feed                                   show the home feed
  post <id>                              show one post
  search <query>                         search #hashtags or profiles
  profile <username>                     show a profile
  whoami                                 show the signed-in account
  login <email> <password>               sign in
  register <email> <username> <name> <password>
  logout                                 sign out
  publish <text>                         publish a post
  like <id> | retweet <id> | delete <id>
  follow <username>                      follow or unfollow
  --version, -V                          print the version";

/// Parse command-line arguments and return the appropriate command.
///
/// `args` includes the program name, as `std::env::args()` does. With no
/// command, [`CliCommand::Feed`] runs.
///
/// # Examples
///
/// ```
/// use mirage::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["mirage".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), CliCommand::Version);
/// ```
pub fn parse_args<I>(args: I) -> CliCommand
where
    I: Iterator<Item = String>,
{
    let args: Vec<String> = args.skip(1).collect();
    let Some((command, rest)) = args.split_first() else {
        return CliCommand::Feed;
    };

    match command.as_str() {
        "--version" | "-V" | "version" => CliCommand::Version,
        "--help" | "-h" | "help" => CliCommand::Help,
        "feed" => CliCommand::Feed,
        "whoami" => CliCommand::Whoami,
        "logout" => CliCommand::Logout,
        "post" => one(rest, "post", CliCommand::Post),
        "profile" => one(rest, "profile", CliCommand::Profile),
        "like" => one(rest, "like", CliCommand::Like),
        "retweet" => one(rest, "retweet", CliCommand::Retweet),
        "delete" => one(rest, "delete", CliCommand::Delete),
        "follow" => one(rest, "follow", CliCommand::Follow),
        "search" => joined(rest, "search", CliCommand::Search),
        "publish" => joined(rest, "publish", CliCommand::Publish),
        "login" => match rest {
            [email, password] => CliCommand::Login {
                email: email.clone(),
                password: password.clone(),
            },
            _ => CliCommand::Invalid("login needs <email> <password>".to_string()),
        },
        "register" => match rest {
            [email, username, display_name, password] => CliCommand::Register {
                email: email.clone(),
                username: username.clone(),
                display_name: display_name.clone(),
                password: password.clone(),
            },
            _ => CliCommand::Invalid(
                "register needs <email> <username> <name> <password>".to_string(),
            ),
        },
        other => CliCommand::Invalid(format!("unknown command: {}", other)),
    }
}

fn one(rest: &[String], name: &str, build: fn(String) -> CliCommand) -> CliCommand {
    match rest {
        [value] => build(value.clone()),
        _ => CliCommand::Invalid(format!("{} needs exactly one argument", name)),
    }
}

fn joined(rest: &[String], name: &str, build: fn(String) -> CliCommand) -> CliCommand {
    if rest.is_empty() {
        return CliCommand::Invalid(format!("{} needs text", name));
    }
    build(rest.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliCommand {
        let args: Vec<String> = std::iter::once("mirage")
            .chain(args.iter().copied())
            .map(String::from)
            .collect();
        parse_args(args.into_iter())
    }

    #[test]
    fn test_parse_version_flag() {
        assert_eq!(parse(&["--version"]), CliCommand::Version);
        assert_eq!(parse(&["-V"]), CliCommand::Version);
    }

    #[test]
    fn test_no_args_shows_feed() {
        assert_eq!(parse(&[]), CliCommand::Feed);
    }

    #[test]
    fn test_parse_login() {
        assert_eq!(
            parse(&["login", "a@b.c", "secret"]),
            CliCommand::Login {
                email: "a@b.c".into(),
                password: "secret".into()
            }
        );
        assert!(matches!(parse(&["login", "a@b.c"]), CliCommand::Invalid(_)));
    }

    #[test]
    fn test_parse_register() {
        assert_eq!(
            parse(&["register", "a@b.c", "alice", "Alice", "secret"]),
            CliCommand::Register {
                email: "a@b.c".into(),
                username: "alice".into(),
                display_name: "Alice".into(),
                password: "secret".into(),
            }
        );
    }

    #[test]
    fn test_search_joins_words() {
        assert_eq!(parse(&["search", "#rust"]), CliCommand::Search("#rust".into()));
        assert_eq!(
            parse(&["publish", "hello", "world"]),
            CliCommand::Publish("hello world".into())
        );
        assert!(matches!(parse(&["search"]), CliCommand::Invalid(_)));
    }

    #[test]
    fn test_single_argument_commands() {
        assert_eq!(parse(&["post", "p1"]), CliCommand::Post("p1".into()));
        assert_eq!(parse(&["follow", "bob"]), CliCommand::Follow("bob".into()));
        assert!(matches!(parse(&["like"]), CliCommand::Invalid(_)));
        assert!(matches!(parse(&["delete", "a", "b"]), CliCommand::Invalid(_)));
    }

    #[test]
    fn test_unknown_command() {
        assert_eq!(
            parse(&["frobnicate"]),
            CliCommand::Invalid("unknown command: frobnicate".into())
        );
    }
}
