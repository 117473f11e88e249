//! Vote counting and statistics

use crate::error::Result;
use crate::poll::{Poll, PollDetails};
use crate::store::{Dataset, PollStore, UserStore, VoteStore};
use crate::types::{OptionId, PollId, UserId, VoteId};
use crate::user::User;
use crate::vote::VoteFilter;
use chrono::{DateTime, Timelike, Utc};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Vote count of one option
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionCount {
    pub id: OptionId,
    pub text: String,
    pub count: usize,
}

/// Per-option tallies of a poll
#[derive(Debug, Clone, Serialize)]
pub struct PollResults {
    pub poll: PollDetails,
    pub results: Vec<OptionCount>,
    pub total_votes: usize,
}

/// Vote count and share of one option
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionStat {
    pub id: OptionId,
    pub text: String,
    pub count: usize,
    /// Share of all vote rows on the poll, 0-100
    pub percentage: f64,
}

/// Votes cast during one hour of the day (UTC)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HourCount {
    pub hour: u32,
    pub count: usize,
}

/// Detailed statistics of a poll
#[derive(Debug, Clone, Serialize)]
pub struct PollStats {
    pub poll: PollDetails,
    pub total_votes: usize,
    pub unique_voters: usize,
    pub option_stats: Vec<OptionStat>,
    /// Always 24 entries, hour 0 first
    pub time_distribution: Vec<HourCount>,
}

/// A poll ranked by recent activity
#[derive(Debug, Clone, Serialize)]
pub struct TrendingPoll {
    #[serde(flatten)]
    pub poll: PollDetails,
    pub vote_count: usize,
}

/// One of a user's recent votes, with display labels
#[derive(Debug, Clone, Serialize)]
pub struct RecentVote {
    pub vote_id: VoteId,
    pub poll_id: PollId,
    pub poll_title: String,
    pub option_id: OptionId,
    pub option_text: String,
    pub created_at: DateTime<Utc>,
}

/// Voting activity of a user
#[derive(Debug, Clone, Serialize)]
pub struct UserStats {
    pub user: User,
    pub participated_polls: usize,
    pub total_votes: usize,
    pub recent_votes: Vec<RecentVote>,
}

fn option_counts(data: &Dataset, details: &PollDetails) -> Vec<OptionCount> {
    details
        .options
        .iter()
        .map(|o| OptionCount {
            id: o.id,
            text: o.text.clone(),
            count: data.count_votes(&VoteFilter::new().with_option(o.id)),
        })
        .collect()
}

/// Tally votes per option
pub fn poll_results(data: &Dataset, poll_id: &PollId) -> Result<PollResults> {
    let poll = data.get_poll_details(poll_id)?;
    let results = option_counts(data, &poll);
    let total_votes = data.count_votes(&VoteFilter::new().with_poll(*poll_id));

    Ok(PollResults {
        poll,
        results,
        total_votes,
    })
}

/// Tally votes, voters and hourly activity
pub fn poll_stats(data: &Dataset, poll_id: &PollId) -> Result<PollStats> {
    let poll = data.get_poll_details(poll_id)?;
    let votes = data.list_votes(&VoteFilter::new().with_poll(*poll_id));
    let total_votes = votes.len();

    let unique_voters = votes
        .iter()
        .map(|v| v.user_id)
        .collect::<HashSet<_>>()
        .len();

    let option_stats = option_counts(data, &poll)
        .into_iter()
        .map(|c| {
            let percentage = if total_votes > 0 {
                c.count as f64 / total_votes as f64 * 100.0
            } else {
                0.0
            };
            OptionStat {
                id: c.id,
                text: c.text,
                count: c.count,
                percentage,
            }
        })
        .collect();

    let mut time_distribution: Vec<HourCount> =
        (0..24).map(|hour| HourCount { hour, count: 0 }).collect();
    for vote in &votes {
        time_distribution[vote.created_at.hour() as usize].count += 1;
    }

    Ok(PollStats {
        poll,
        total_votes,
        unique_voters,
        option_stats,
        time_distribution,
    })
}

/// Polls with the most votes cast after `since`, busiest first.
/// Ties go to the newer poll.
pub fn trending_polls(data: &Dataset, since: DateTime<Utc>, limit: usize) -> Vec<TrendingPoll> {
    let mut counts: HashMap<PollId, usize> = HashMap::new();
    for vote in data.list_votes(&VoteFilter::new().since(since)) {
        *counts.entry(vote.poll_id).or_insert(0) += 1;
    }

    let mut ranked: Vec<(Poll, usize)> = data
        .list_polls()
        .into_iter()
        .filter_map(|p| counts.get(&p.id).map(|&c| (p, c)))
        .collect();
    ranked.sort_by(|(a, a_count), (b, b_count)| {
        b_count
            .cmp(a_count)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });

    ranked
        .into_iter()
        .take(limit)
        .map(|(poll, vote_count)| TrendingPoll {
            poll: PollDetails {
                options: data.list_options(&poll.id),
                poll,
            },
            vote_count,
        })
        .collect()
}

/// Summarize a user's voting
pub fn user_stats(data: &Dataset, user_id: &UserId, recent_limit: usize) -> Result<UserStats> {
    let user = data.get_user(user_id)?;
    let mut votes = data.list_votes(&VoteFilter::new().with_user(*user_id));

    let participated_polls = votes
        .iter()
        .map(|v| v.poll_id)
        .collect::<HashSet<_>>()
        .len();
    let total_votes = votes.len();

    votes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    let recent_votes = votes
        .into_iter()
        .take(recent_limit)
        .map(|v| RecentVote {
            vote_id: v.id,
            poll_id: v.poll_id,
            poll_title: data.get_poll(&v.poll_id).map(|p| p.title).unwrap_or_default(),
            option_id: v.option_id,
            option_text: data.get_option(&v.option_id).map(|o| o.text).unwrap_or_default(),
            created_at: v.created_at,
        })
        .collect();

    Ok(UserStats {
        user,
        participated_polls,
        total_votes,
        recent_votes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poll::{PollOption, PollType};
    use crate::vote::Vote;
    use chrono::{Duration, TimeZone};

    struct Seed {
        data: Dataset,
        poll: Poll,
        options: Vec<PollOption>,
    }

    fn seed(poll_type: PollType, labels: &[&str]) -> Seed {
        let mut data = Dataset::new();
        let poll = Poll::new("Lunch", "", poll_type, None);
        let options: Vec<PollOption> = labels.iter().map(|l| PollOption::new(poll.id, *l)).collect();
        data.insert_poll(poll.clone());
        for o in &options {
            data.insert_option(o.clone());
        }
        Seed { data, poll, options }
    }

    #[test]
    fn test_results_count_per_option() {
        let mut s = seed(PollType::Single, &["A", "B", "C"]);
        let now = Utc::now();
        s.data.insert_vote(Vote::new(s.poll.id, s.options[0].id, UserId::new(), now));
        s.data.insert_vote(Vote::new(s.poll.id, s.options[0].id, UserId::new(), now));
        s.data.insert_vote(Vote::new(s.poll.id, s.options[2].id, UserId::new(), now));

        let results = poll_results(&s.data, &s.poll.id).unwrap();

        let counts: Vec<usize> = results.results.iter().map(|r| r.count).collect();
        assert_eq!(counts, vec![2, 0, 1]);
        assert_eq!(results.total_votes, 3);
    }

    #[test]
    fn test_stats_percentages_and_hours() {
        let mut s = seed(PollType::Multi, &["A", "B"]);
        let alice = UserId::new();
        let at_nine = Utc.with_ymd_and_hms(2024, 5, 1, 9, 15, 0).unwrap();
        let at_ten = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        s.data.insert_vote(Vote::new(s.poll.id, s.options[0].id, alice, at_nine));
        s.data.insert_vote(Vote::new(s.poll.id, s.options[1].id, alice, at_nine));
        s.data.insert_vote(Vote::new(s.poll.id, s.options[0].id, UserId::new(), at_ten));
        s.data.insert_vote(Vote::new(s.poll.id, s.options[0].id, UserId::new(), at_ten));

        let stats = poll_stats(&s.data, &s.poll.id).unwrap();

        assert_eq!(stats.total_votes, 4);
        assert_eq!(stats.unique_voters, 3);
        assert_eq!(stats.option_stats[0].percentage, 75.0);
        assert_eq!(stats.option_stats[1].percentage, 25.0);
        assert_eq!(stats.time_distribution.len(), 24);
        assert_eq!(stats.time_distribution[9].count, 2);
        assert_eq!(stats.time_distribution[10].count, 2);
        assert_eq!(stats.time_distribution[11].count, 0);
    }

    #[test]
    fn test_stats_without_votes() {
        let s = seed(PollType::Single, &["A", "B"]);
        let stats = poll_stats(&s.data, &s.poll.id).unwrap();
        assert_eq!(stats.total_votes, 0);
        assert!(stats.option_stats.iter().all(|o| o.percentage == 0.0));
    }

    #[test]
    fn test_trending_ranks_recent_votes() {
        let mut data = Dataset::new();
        let now = Utc::now();
        let mut polls = Vec::new();
        for title in ["quiet", "busy", "stale"] {
            let poll = Poll::new(title, "", PollType::Single, None);
            let option = PollOption::new(poll.id, "x");
            data.insert_poll(poll.clone());
            data.insert_option(option.clone());
            polls.push((poll, option));
        }
        let vote = |(p, o): &(Poll, PollOption), at| Vote::new(p.id, o.id, UserId::new(), at);

        data.insert_vote(vote(&polls[0], now));
        data.insert_vote(vote(&polls[1], now));
        data.insert_vote(vote(&polls[1], now));
        data.insert_vote(vote(&polls[2], now - Duration::days(30)));

        let trending = trending_polls(&data, now - Duration::days(7), 10);

        let titles: Vec<&str> = trending.iter().map(|t| t.poll.poll.title.as_str()).collect();
        assert_eq!(titles, vec!["busy", "quiet"]);
        assert_eq!(trending[0].vote_count, 2);
        assert_eq!(trending[0].poll.options.len(), 1);

        assert_eq!(trending_polls(&data, now - Duration::days(7), 1).len(), 1);
    }

    #[test]
    fn test_user_stats() {
        let mut s = seed(PollType::Multi, &["A", "B"]);
        let user = User::new("alice");
        s.data.insert_user(user.clone());
        let base = Utc::now();
        s.data.insert_vote(Vote::new(s.poll.id, s.options[0].id, user.id, base));
        s.data.insert_vote(Vote::new(
            s.poll.id,
            s.options[1].id,
            user.id,
            base + Duration::seconds(5),
        ));

        let stats = user_stats(&s.data, &user.id, 1).unwrap();

        assert_eq!(stats.participated_polls, 1);
        assert_eq!(stats.total_votes, 2);
        assert_eq!(stats.recent_votes.len(), 1);
        assert_eq!(stats.recent_votes[0].option_text, "B");
        assert_eq!(stats.recent_votes[0].poll_title, "Lunch");
    }

    #[test]
    fn test_user_stats_unknown_user() {
        let s = seed(PollType::Single, &["A", "B"]);
        assert!(user_stats(&s.data, &UserId::new(), 10).is_err());
    }
}
