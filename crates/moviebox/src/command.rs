//! Command-line parsing.
//!
//! Each input line is one command; most commands map to an [`Intent`].

use moviebox_auth::ProfileUpdate;
use moviebox_catalog::SortBy;
use moviebox_core::{FiltersPatch, Intent, ListKind};

/// A parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Run an intent against the store.
    Dispatch(Intent),
    /// Print a state summary, or the whole state as JSON.
    State {
        /// Print JSON instead of the summary.
        json: bool,
    },
    /// Print the command list.
    Help,
    /// Leave the shell.
    Quit,
}

/// Command reference printed by `help`.
pub const HELP: &str = "\
Catalog:
  popular [page]            now-playing [page]        upcoming [page]
  search <query>            genre <id> [page]         genres
  more <list>               movie <id>                close
  filters year=<y|none> rating=<r|none> sort=<popularity|rating|release|title>
  clear-search              clear-errors
Collections:
  fav <id>                  watch <id>
Account:
  signin <email> <password> signup <name> <email> <password>
  signout                   profile name=<..> bio=<..> avatar=<..>
  passwd <current> <new> <confirm>
Other:
  state [json]              help                      quit";

/// Parses one input line; a blank line yields `None`.
pub fn parse(line: &str) -> Result<Option<Command>, String> {
    let mut words = line.split_whitespace();
    let Some(name) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let intent = match name.to_lowercase().as_str() {
        "help" | "?" => return Ok(Some(Command::Help)),
        "quit" | "exit" => return Ok(Some(Command::Quit)),
        "state" => {
            let json = matches!(args.first(), Some(&"json"));
            return Ok(Some(Command::State { json }));
        }
        "popular" => Intent::FetchPopular {
            page: page_arg(args.first())?,
        },
        "now-playing" => Intent::FetchNowPlaying {
            page: page_arg(args.first())?,
        },
        "upcoming" => Intent::FetchUpcoming {
            page: page_arg(args.first())?,
        },
        "search" => Intent::Search {
            query: args.join(" "),
            page: 1,
        },
        "genre" => Intent::FetchByGenre {
            genre_id: number(args.first(), "genre id")?,
            page: page_arg(args.get(1))?,
        },
        "genres" => Intent::FetchGenres,
        "more" => {
            let list = args.first().ok_or("usage: more <list>")?;
            Intent::LoadNextPage(
                ListKind::parse(list).ok_or_else(|| format!("unknown list '{list}'"))?,
            )
        }
        "movie" => Intent::FetchMovieDetails(number(args.first(), "movie id")?),
        "close" => Intent::ClearCurrentMovie,
        "fav" => Intent::ToggleFavorite(number(args.first(), "movie id")?),
        "watch" => Intent::ToggleWatchlist(number(args.first(), "movie id")?),
        "clear-search" => Intent::ClearSearch,
        "clear-errors" => Intent::ClearError(None),
        "filters" => Intent::SetFilters(filters(&args)?),
        "signin" => match args.as_slice() {
            [email, password] => Intent::SignIn {
                email: (*email).to_string(),
                password: (*password).to_string(),
            },
            _ => return Err("usage: signin <email> <password>".into()),
        },
        "signup" => match args.as_slice() {
            [name @ .., email, password] if !name.is_empty() => Intent::SignUp {
                name: name.join(" "),
                email: (*email).to_string(),
                password: (*password).to_string(),
            },
            _ => return Err("usage: signup <name> <email> <password>".into()),
        },
        "signout" => Intent::SignOut,
        "profile" => Intent::UpdateProfile(profile(&args)?),
        "passwd" => match args.as_slice() {
            [current, new, confirm] => Intent::ChangePassword {
                current: (*current).to_string(),
                new: (*new).to_string(),
                confirm: (*confirm).to_string(),
            },
            _ => return Err("usage: passwd <current> <new> <confirm>".into()),
        },
        other => return Err(format!("unknown command '{other}'; try 'help'")),
    };
    Ok(Some(Command::Dispatch(intent)))
}

fn page_arg(arg: Option<&&str>) -> Result<u32, String> {
    arg.map_or(Ok(1), |s| {
        s.parse().map_err(|_| format!("invalid page '{s}'"))
    })
}

fn number<T: std::str::FromStr>(arg: Option<&&str>, what: &str) -> Result<T, String> {
    let s = arg.ok_or_else(|| format!("missing {what}"))?;
    s.parse().map_err(|_| format!("invalid {what} '{s}'"))
}

/// Splits `key=value` words; words without `=` continue the previous value.
fn pairs(args: &[&str]) -> Result<Vec<(String, String)>, String> {
    let mut out: Vec<(String, String)> = Vec::new();
    for word in args {
        if let Some((key, value)) = word.split_once('=') {
            out.push((key.to_lowercase(), value.to_string()));
        } else if let Some((_, value)) = out.last_mut() {
            value.push(' ');
            value.push_str(word);
        } else {
            return Err(format!("expected key=value, got '{word}'"));
        }
    }
    Ok(out)
}

fn filters(args: &[&str]) -> Result<FiltersPatch, String> {
    let mut patch = FiltersPatch::default();
    for (key, value) in pairs(args)? {
        let cleared = value.is_empty() || value == "none";
        match key.as_str() {
            "year" => {
                patch.year = Some(if cleared {
                    None
                } else {
                    Some(value.parse().map_err(|_| format!("invalid year '{value}'"))?)
                });
            }
            "rating" => {
                patch.min_rating = Some(if cleared {
                    None
                } else {
                    Some(
                        value
                            .parse()
                            .map_err(|_| format!("invalid rating '{value}'"))?,
                    )
                });
            }
            "sort" => {
                patch.sort_by = Some(
                    SortBy::parse(&value).ok_or_else(|| format!("unknown sort '{value}'"))?,
                );
            }
            other => return Err(format!("unknown filter '{other}'")),
        }
    }
    Ok(patch)
}

fn profile(args: &[&str]) -> Result<ProfileUpdate, String> {
    let mut update = ProfileUpdate::default();
    for (key, value) in pairs(args)? {
        match key.as_str() {
            "name" => update.name = Some(value),
            "bio" => update.bio = Some(value),
            "avatar" => update.avatar_url = Some(value),
            other => return Err(format!("unknown profile field '{other}'")),
        }
    }
    Ok(update)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn intent(line: &str) -> Intent {
        match parse(line).unwrap() {
            Some(Command::Dispatch(intent)) => intent,
            other => panic!("expected an intent, got {other:?}"),
        }
    }

    #[test]
    fn test_blank_line() {
        assert_eq!(parse("   ").unwrap(), None);
    }

    #[test]
    fn test_list_commands_default_to_first_page() {
        assert_eq!(intent("popular"), Intent::FetchPopular { page: 1 });
        assert_eq!(intent("upcoming 3"), Intent::FetchUpcoming { page: 3 });
        assert_eq!(
            intent("genre 28 2"),
            Intent::FetchByGenre {
                genre_id: 28,
                page: 2
            }
        );
        assert!(parse("popular two").is_err());
    }

    #[test]
    fn test_search_keeps_whole_query() {
        assert_eq!(
            intent("search the dark knight"),
            Intent::Search {
                query: "the dark knight".into(),
                page: 1
            }
        );
    }

    #[test]
    fn test_more_parses_list_name() {
        assert_eq!(intent("more now-playing"), Intent::LoadNextPage(ListKind::NowPlaying));
        assert!(parse("more favorites").is_err());
        assert!(parse("more").is_err());
    }

    #[test]
    fn test_signup_name_may_contain_spaces() {
        assert_eq!(
            intent("signup Ada Lovelace ada@example.com secret1"),
            Intent::SignUp {
                name: "Ada Lovelace".into(),
                email: "ada@example.com".into(),
                password: "secret1".into(),
            }
        );
        assert!(parse("signup ada@example.com secret1").is_err());
    }

    #[test]
    fn test_profile_values_span_words() {
        let Intent::UpdateProfile(update) = intent("profile name=Ada bio=Loves old films") else {
            panic!("expected a profile update");
        };
        assert_eq!(update.name.as_deref(), Some("Ada"));
        assert_eq!(update.bio.as_deref(), Some("Loves old films"));
        assert_eq!(update.avatar_url, None);
        assert!(parse("profile Ada").is_err());
    }

    #[test]
    fn test_filters() {
        let Intent::SetFilters(patch) = intent("filters year=1999 rating=none sort=rating") else {
            panic!("expected filters");
        };
        assert_eq!(patch.year, Some(Some(1999)));
        assert_eq!(patch.min_rating, Some(None));
        assert_eq!(patch.sort_by, Some(SortBy::Rating));
        assert!(parse("filters color=red").is_err());
        assert!(parse("filters sort=loudness").is_err());
    }

    #[test]
    fn test_shell_commands() {
        assert_eq!(parse("help").unwrap(), Some(Command::Help));
        assert_eq!(parse("QUIT").unwrap(), Some(Command::Quit));
        assert_eq!(
            parse("state json").unwrap(),
            Some(Command::State { json: true })
        );
        assert!(parse("rewind").is_err());
    }
}
