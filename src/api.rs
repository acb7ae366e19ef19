pub mod experiment_dto;
