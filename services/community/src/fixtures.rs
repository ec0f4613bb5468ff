//! Fixture data served by the in-memory service
//!
//! Timestamps are relative to an anchor supplied by the caller, so the same
//! anchor always yields identical records.

use chrono::{DateTime, Duration, Utc};

use crate::models::{
    Conversation, DeliveryStatus, Discussion, DiscussionReply, LastMessage, LastReply, Message,
    MessageType, Poll, PollOption, Post, PostType, UserSummary,
};

/// Identity the fixtures use for "the current user"
pub const CURRENT_USER_FIXTURE_ID: &str = "mock-user-id";

const SUNRISE_IMAGE_URL: &str =
    "https://images.pexels.com/photos/1431822/pexels-photo-1431822.jpeg?auto=compress&cs=tinysrgb&w=800";

fn hours_ago(anchor: DateTime<Utc>, hours: i64) -> DateTime<Utc> {
    anchor - Duration::hours(hours)
}

fn minutes_ago(anchor: DateTime<Utc>, minutes: i64) -> DateTime<Utc> {
    anchor - Duration::minutes(minutes)
}

fn tags(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[allow(clippy::too_many_arguments)]
fn post(
    anchor: DateTime<Utc>,
    id: &str,
    author: UserSummary,
    content: &str,
    post_type: PostType,
    age_hours: i64,
    (likes, comments, shares): (u32, u32, u32),
    hashtags: &[&str],
    has_liked: bool,
) -> Post {
    let at = hours_ago(anchor, age_hours);
    Post {
        id: id.to_string(),
        user_id: author.id.clone(),
        author,
        content: content.to_string(),
        post_type,
        created_at: at,
        updated_at: at,
        likes,
        comments,
        shares,
        hashtags: tags(hashtags),
        has_liked,
        is_public: true,
        category: None,
        image_url: None,
        image_caption: None,
        poll: None,
    }
}

fn poll_option(id: &str, text: &str, votes: u32, total: u32) -> PollOption {
    PollOption {
        id: id.to_string(),
        text: text.to_string(),
        votes,
        percentage: f64::from(votes) * 100.0 / f64::from(total),
        has_voted: false,
    }
}

/// Community feed
pub fn posts(anchor: DateTime<Utc>) -> Vec<Post> {
    let mut milestone = post(
        anchor,
        "1",
        UserSummary::named("user1", "Ahmad_99"),
        "Alhamdulillah! Day 21 of reading this book 📖 The Soul section is really opening my heart. May Allah guide us all 🤲",
        PostType::Milestone,
        2,
        (34, 8, 2),
        &["#Day21", "#BookProgress", "#Alhamdulillah"],
        false,
    );
    milestone.category = Some("Book Progress".to_string());

    let mut moment = post(
        anchor,
        "2",
        UserSummary::named("user2", "Fatima.Learns"),
        "Beautiful sunrise during Fajr today 🌅 Starting my morning dhikr routine. \"SubhanAllahi wa bihamdihi\" 100x ✨",
        PostType::Moment,
        4,
        (67, 12, 5),
        &["#FajrVibes", "#MorningDhikr"],
        true,
    );
    moment.image_url = Some(SUNRISE_IMAGE_URL.to_string());
    moment.image_caption = Some("Beautiful sunrise 🌅".to_string());

    let mut poll = post(
        anchor,
        "3",
        UserSummary::named("user3", "Omar_Polls"),
        "What time do you usually pray Fajr? Trying to build consistency 🤲",
        PostType::Poll,
        6,
        (23, 15, 1),
        &["#Fajr", "#Consistency"],
        false,
    );
    poll.poll = Some(Poll {
        question: "What time do you usually pray Fajr?".to_string(),
        options: vec![
            poll_option("opt1", "Right at Adhan time", 70, 100),
            poll_option("opt2", "10-15 minutes after", 20, 100),
            poll_option("opt3", "Before sunrise", 10, 100),
        ],
        total_votes: 100,
        allow_multiple_votes: false,
        expires_at: Some(anchor + Duration::days(7)),
    });

    let mut image = post(
        anchor,
        "4",
        UserSummary::named("user4", "Sara_Photography"),
        "Captured this beautiful moment during my evening walk 🚶‍♀️ The golden hour light was perfect for reflection",
        PostType::Image,
        8,
        (45, 6, 3),
        &["#GoldenHour", "#Reflection", "#Photography"],
        false,
    );
    image.image_url = Some(SUNRISE_IMAGE_URL.to_string());
    image.image_caption = Some("Evening golden hour 🌅".to_string());

    vec![milestone, moment, poll, image]
}

/// Discussion board
pub fn discussions(anchor: DateTime<Utc>) -> Vec<Discussion> {
    vec![
        Discussion {
            id: "1".to_string(),
            title: "How to maintain focus during long prayers?".to_string(),
            content: "I recently converted to Islam and I'm struggling to maintain concentration during Maghrib and Isha prayers...".to_string(),
            category: "Islamic Practice & Spirituality".to_string(),
            author: UserSummary::named("user4", "NewMuslim_Sister"),
            created_at: hours_ago(anchor, 3),
            updated_at: minutes_ago(anchor, 15),
            replies: 47,
            views: 156,
            last_reply: Some(LastReply {
                author_name: "Scholar_Ahmad".to_string(),
                timestamp: "15min ago".to_string(),
            }),
            is_pinned: false,
            is_solved: true,
            is_scholarly: false,
            tags: tags(&["prayer", "focus", "new-muslim"]),
        },
        Discussion {
            id: "2".to_string(),
            title: "Chapter 4 Discussion: \"Disciplining the Nafs\" - Your thoughts?".to_string(),
            content: "Let's discuss the key concepts from Chapter 4. What strategies resonated with you for controlling desires?".to_string(),
            category: "Book Study & Reflection".to_string(),
            author: UserSummary::named("admin1", "BookClub_Admin"),
            created_at: hours_ago(anchor, 24),
            updated_at: hours_ago(anchor, 2),
            replies: 89,
            views: 234,
            last_reply: Some(LastReply {
                author_name: "Yusuf_Reader".to_string(),
                timestamp: "2h ago".to_string(),
            }),
            is_pinned: true,
            is_solved: false,
            is_scholarly: false,
            tags: tags(&["book-study", "nafs", "self-discipline"]),
        },
    ]
}

/// Replies attached to whichever discussion was requested
pub fn discussion_replies(anchor: DateTime<Utc>, discussion_id: &str) -> Vec<DiscussionReply> {
    let reply = |id: &str, author: UserSummary, content: &str, likes: u32, accepted, age| {
        DiscussionReply {
            id: id.to_string(),
            discussion_id: discussion_id.to_string(),
            user_id: author.id.clone(),
            content: content.to_string(),
            likes_count: likes,
            is_accepted_answer: accepted,
            parent_reply_id: None,
            created_at: hours_ago(anchor, age),
            updated_at: hours_ago(anchor, age),
            author,
        }
    };

    vec![
        reply(
            "1",
            UserSummary::named("user1", "Scholar_Ahmad"),
            "I found that focusing on the meaning of the words really helps. Try reciting slowly and understanding what you're saying.",
            12,
            true,
            2,
        ),
        reply(
            "2",
            UserSummary::named("user2", "Fatima.Learns"),
            "Also, try to find a quiet place and minimize distractions. I found that praying in a dedicated prayer space helps a lot.",
            8,
            false,
            1,
        ),
    ]
}

/// Inbox of the current user
pub fn conversations(anchor: DateTime<Utc>) -> Vec<Conversation> {
    vec![
        Conversation {
            id: "1".to_string(),
            participants: vec![UserSummary::named("user5", "Omar.Journey")],
            last_message: Some(LastMessage {
                content: "Thank you for your support with the book recommendation! 📚".to_string(),
                timestamp: minutes_ago(anchor, 30),
                sender_id: "user5".to_string(),
            }),
            unread_count: 1,
            updated_at: minutes_ago(anchor, 30),
        },
        Conversation {
            id: "2".to_string(),
            participants: vec![UserSummary::named("user6", "Aisha.Study")],
            last_message: Some(LastMessage {
                content: "Looking forward to the discussion about morning routines.".to_string(),
                timestamp: hours_ago(anchor, 24),
                sender_id: CURRENT_USER_FIXTURE_ID.to_string(),
            }),
            unread_count: 0,
            updated_at: hours_ago(anchor, 24),
        },
    ]
}

/// Messages of a conversation
pub fn messages(anchor: DateTime<Utc>) -> Vec<Message> {
    let message = |id: &str, from: &str, to: &str, content: &str, at, read: bool| Message {
        id: id.to_string(),
        sender_id: from.to_string(),
        receiver_id: to.to_string(),
        content: content.to_string(),
        created_at: at,
        is_read: read,
        message_type: MessageType::Text,
        media_url: None,
        media_caption: None,
        media_duration: None,
        media_size: None,
        media_file_name: None,
        media_mime_type: None,
        delivery_status: if read {
            DeliveryStatus::Read
        } else {
            DeliveryStatus::Sent
        },
        reply_to_message_id: None,
    };

    vec![
        message(
            "1",
            "user5",
            CURRENT_USER_FIXTURE_ID,
            "Hello! How are you doing with the book?",
            hours_ago(anchor, 2),
            true,
        ),
        message(
            "2",
            CURRENT_USER_FIXTURE_ID,
            "user5",
            "Great! I'm on chapter 4 now. Really enjoying it.",
            hours_ago(anchor, 1),
            true,
        ),
        message(
            "3",
            "user5",
            CURRENT_USER_FIXTURE_ID,
            "Thank you for your support with the book recommendation! 📚",
            minutes_ago(anchor, 30),
            false,
        ),
    ]
}

/// Searchable user directory
pub fn users(anchor: DateTime<Utc>) -> Vec<UserSummary> {
    vec![
        UserSummary {
            id: "user7".to_string(),
            name: "Ahmad_Scholar".to_string(),
            avatar: None,
            is_online: Some(true),
            last_seen: Some(anchor),
            bio: Some("Islamic studies student".to_string()),
        },
        UserSummary {
            id: "user8".to_string(),
            name: "Fatima_Reader".to_string(),
            avatar: None,
            is_online: Some(false),
            last_seen: Some(hours_ago(anchor, 2)),
            bio: Some("Love reading and self-development".to_string()),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_fixture_percentages_match_votes() {
        let anchor = Utc::now();
        let poll = posts(anchor)
            .into_iter()
            .find_map(|p| p.poll)
            .expect("feed should contain a poll");

        let votes: u32 = poll.options.iter().map(|o| o.votes).sum();
        assert_eq!(votes, poll.total_votes);
        assert_eq!(poll.options[0].percentage, 70.0);
        assert_eq!(poll.expires_at, Some(anchor + Duration::days(7)));
    }

    #[test]
    fn test_replies_carry_requested_discussion_id() {
        let replies = discussion_replies(Utc::now(), "abc");
        assert_eq!(replies.len(), 2);
        assert!(replies.iter().all(|r| r.discussion_id == "abc"));
        assert_eq!(
            replies.iter().filter(|r| r.is_accepted_answer).count(),
            1
        );
    }

    #[test]
    fn test_message_delivery_status_follows_read_flag() {
        for message in messages(Utc::now()) {
            let expected = if message.is_read {
                DeliveryStatus::Read
            } else {
                DeliveryStatus::Sent
            };
            assert_eq!(message.delivery_status, expected);
        }
    }
}
