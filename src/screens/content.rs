// Screen content: names, wishes, memories, photos and the surprise card.
// Edit here to personalise the experience.

use super::{Memory, Photo, Wish};

pub const RECIPIENT_NAME: &str = "My Dearest";

pub const LOADING_MESSAGES: [&str; 5] = [
    "Collecting happy memories...",
    "Decorating the party...",
    "Wrapping the surprise...",
    "Lighting the candles...",
    "Almost ready...",
];

pub const PHOTOS: [Photo; 3] = [
    Photo { src: "/images/photo1.jpg", caption: "Sunny afternoon" },
    Photo { src: "/images/photo2.jpg", caption: "By the lake" },
    Photo { src: "/images/photo3.jpg", caption: "That evening" },
];

pub const WISHES: [Wish; 3] = [
    Wish { text: "Happy birthday, my love!", from: "Yours, always" },
    Wish { text: "May you keep that bright smile forever", from: "The one who loves you most" },
    Wish { text: "May every one of your days be full of sunshine", from: "Forever on your side" },
];

pub const MEMORIES: [Memory; 3] = [
    Memory {
        image: "/images/memory1.jpg",
        title: "Our first date",
        description: "The sun was lovely that day, your smile even more so",
        date: "2023-01-15",
    },
    Memory {
        image: "/images/memory2.jpg",
        title: "Watching the sunset",
        description: "Under the evening sky we made a promise",
        date: "2023-03-20",
    },
    Memory {
        image: "/images/memory3.jpg",
        title: "Candlelit dinner",
        description: "In the candlelight you were the brightest star",
        date: "2023-06-01",
    },
];

pub const SCRATCH_PROMPT: &str = "Scratch the area below";
pub const SURPRISE_REVEALED_HEADING: &str = "Your surprise";
pub const SURPRISE_TITLE: &str = "My promise";
pub const SURPRISE_BODY: &str = "This is a special gift just for you.\nAfter today, I will take you to...";
pub const SURPRISE_IMAGE: &str = "/images/surprise.jpg";
pub const SURPRISE_FOOTER: &str = "I hope this surprise makes you smile ❤️";
