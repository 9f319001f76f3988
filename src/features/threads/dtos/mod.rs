pub mod thread_dto;

pub use thread_dto::{
    AuthorDto, CreateMessageRequestDto, CreateThreadRequestDto, LikeRequestDto,
    LikeStatusResponseDto, MessageResponseDto, ThreadResponseDto, UpdateThreadRequestDto,
};
